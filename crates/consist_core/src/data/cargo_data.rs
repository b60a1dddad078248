//! Cargo, token and payment data structures.

use serde::{Deserialize, Serialize};

super::string_id! {
    /// Unique identifier for cargo types.
    CargoTypeId
}

super::string_id! {
    /// Unique identifier for token types (in-game currencies).
    TokenTypeId
}

/// A kind of goods a wagon carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CargoType {
    /// Unique identifier.
    pub id: CargoTypeId,

    /// Display name.
    pub name: String,

    /// Display color as RGB values (0-255).
    #[serde(default = "default_color")]
    pub color: [u8; 3],

    /// Icon reference.
    #[serde(default)]
    pub icon: String,
}

/// Default cargo color (grey).
const fn default_color() -> [u8; 3] {
    [128, 128, 128]
}

impl CargoType {
    /// Create a new cargo type with default color and no icon.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CargoTypeId::new(id),
            name: name.into(),
            color: default_color(),
            icon: String::new(),
        }
    }

    /// Set the display color.
    #[must_use]
    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    /// Set the icon reference.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

/// A currency or resource unit used in payments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenType {
    /// Unique identifier.
    pub id: TokenTypeId,

    /// Display name.
    pub name: String,

    /// Icon reference.
    #[serde(default)]
    pub icon: String,
}

impl TokenType {
    /// Create a new token type with no icon.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: TokenTypeId::new(id),
            name: name.into(),
            icon: String::new(),
        }
    }
}

/// An amount of a single token, used for purchase, sale and running costs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Payment {
    /// Token being paid.
    pub token_type: TokenTypeId,

    /// Amount of the token.
    pub amount: u32,
}

impl Payment {
    /// Create a new payment.
    #[must_use]
    pub fn new(token_type: impl Into<String>, amount: u32) -> Self {
        Self {
            token_type: TokenTypeId::new(token_type),
            amount,
        }
    }

    /// This payment repeated `count` times.
    #[must_use]
    pub fn times(&self, count: u32) -> Self {
        Self {
            token_type: self.token_type.clone(),
            amount: self.amount * count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_times_scales_linearly() {
        let payment = Payment::new("money", 250);
        assert_eq!(payment.times(3), Payment::new("money", 750));
        assert_eq!(payment.times(0).amount, 0);
    }

    #[test]
    fn test_cargo_type_builder() {
        let cargo = CargoType::new("coal", "Coal")
            .with_color([20, 20, 20])
            .with_icon("icons/coal.png");
        assert_eq!(cargo.id.as_str(), "coal");
        assert_eq!(cargo.color, [20, 20, 20]);
        assert_eq!(cargo.icon, "icons/coal.png");
    }
}
