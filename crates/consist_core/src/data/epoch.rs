//! Progression tiers and track requirements.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Game-time progression tier gating which vehicles can be bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Epoch {
    /// First tier.
    EarlySteam = 1,
    /// Second tier.
    Steam = 2,
    /// Third tier.
    EarlyDiesel = 3,
    /// Fourth tier.
    Diesel = 4,
    /// Fifth tier.
    EarlyElectric = 5,
    /// Sixth tier.
    Electric = 6,
    /// Seventh and last tier.
    LateElectric = 7,
}

impl Epoch {
    /// Every epoch in progression order.
    pub const ALL: [Epoch; 7] = [
        Epoch::EarlySteam,
        Epoch::Steam,
        Epoch::EarlyDiesel,
        Epoch::Diesel,
        Epoch::EarlyElectric,
        Epoch::Electric,
        Epoch::LateElectric,
    ];

    /// The tier number, starting at 1.
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Look up an epoch by tier number.
    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|epoch| epoch.number() == number)
    }

    /// Get the display name for this epoch.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::EarlySteam => "Early steam",
            Self::Steam => "Steam",
            Self::EarlyDiesel => "Early diesel",
            Self::Diesel => "Diesel",
            Self::EarlyElectric => "Early electric",
            Self::Electric => "Electric",
            Self::LateElectric => "Late electric",
        }
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Track a vehicle needs to run on.
///
/// Ordered so that the most demanding requirement compares greatest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Track {
    /// Plain track.
    #[default]
    Standard,
    /// Electrified track.
    Electric,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("Standard"),
            Self::Electric => f.write_str("Electric"),
        }
    }
}
