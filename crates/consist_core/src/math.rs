//! Fixed-point math utilities for deterministic composition.
//!
//! Vehicle lengths and usage ratios are fractional, so they use
//! fixed-point arithmetic. Weights, capacities and payments stay integral.
//! Identical inputs must rank identically on every platform, which rules
//! out floating-point in the search path.

use fixed::types::I32F32;

/// Fixed-point number type for lengths and ratios.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

/// Serde support for `Option<Fixed>`.
pub mod option_fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize an optional fixed-point number.
    pub fn serialize<S>(value: &Option<Fixed>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => v.to_bits().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional fixed-point number.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Fixed>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt = Option::<i64>::deserialize(deserializer)?;
        Ok(opt.map(Fixed::from_bits))
    }
}

/// Convert a whole number of tiles to fixed-point.
#[must_use]
pub fn tiles(n: u32) -> Fixed {
    Fixed::from_num(n)
}

/// How many whole `unit`s fit into `headroom`.
///
/// Negative headroom (already over the target) and non-positive units
/// both yield zero. A unit too small to divide by saturates.
#[must_use]
pub fn whole_units(headroom: Fixed, unit: Fixed) -> usize {
    if headroom <= Fixed::ZERO || unit <= Fixed::ZERO {
        return 0;
    }
    headroom
        .checked_div(unit)
        .map_or(usize::MAX, |units| units.floor().saturating_to_num::<usize>())
}

/// Integer variant of [`whole_units`].
#[must_use]
pub fn whole_units_int(headroom: i64, unit: u32) -> usize {
    if headroom <= 0 || unit == 0 {
        return 0;
    }
    usize::try_from(headroom / i64::from(unit)).unwrap_or(0)
}

/// `numerator / denominator` as fixed-point, `None` for a zero denominator.
#[must_use]
pub fn ratio(numerator: Fixed, denominator: Fixed) -> Option<Fixed> {
    if denominator == Fixed::ZERO {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Divide and round to the nearest integer, ties to even.
///
/// Returns 0 for a zero denominator.
#[must_use]
pub fn div_round_half_even(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    let quotient = numerator / denominator;
    let twice_remainder = (numerator % denominator) * 2;

    match twice_remainder.cmp(&denominator) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal if quotient % 2 == 0 => quotient,
        std::cmp::Ordering::Equal => quotient + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_units_floors() {
        assert_eq!(whole_units(tiles(5), tiles(2)), 2);
        assert_eq!(whole_units(Fixed::from_num(5.5), Fixed::from_num(0.5)), 11);
    }

    #[test]
    fn test_whole_units_clamps_negative_headroom() {
        assert_eq!(whole_units(Fixed::from_num(-3), tiles(1)), 0);
        assert_eq!(whole_units_int(-30, 10), 0);
    }

    #[test]
    fn test_whole_units_ignores_zero_unit() {
        assert_eq!(whole_units(tiles(5), Fixed::ZERO), 0);
        assert_eq!(whole_units_int(50, 0), 0);
    }

    #[test]
    fn test_whole_units_saturates_on_tiny_unit() {
        assert_eq!(whole_units(tiles(1_000_000), Fixed::DELTA), usize::MAX);
    }

    #[test]
    fn test_whole_units_int() {
        assert_eq!(whole_units_int(661, 10), 66);
        assert_eq!(whole_units_int(9, 10), 0);
    }

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio(tiles(1), Fixed::ZERO), None);
        assert_eq!(ratio(tiles(3), tiles(6)), Some(Fixed::from_num(0.5)));
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(div_round_half_even(250, 100), 2);
        assert_eq!(div_round_half_even(350, 100), 4);
        assert_eq!(div_round_half_even(251, 100), 3);
        assert_eq!(div_round_half_even(249, 100), 2);
        assert_eq!(div_round_half_even(2300, 100), 23);
        assert_eq!(div_round_half_even(7, 0), 0);
    }

    #[test]
    fn test_fixed_determinism() {
        let a = Fixed::from_num(1) / Fixed::from_num(3);
        let b = Fixed::from_num(1) / Fixed::from_num(3);
        assert_eq!(a, b);
        assert_eq!(a * Fixed::from_num(7), b * Fixed::from_num(7));
    }
}
