//! Market creation tiers

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Creation-privilege level chosen once per draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Entry level, good for quick predictions
    Basic,
    /// Higher visibility with a creator reward share
    Trusted,
    /// Maximum exposure and the largest reward share
    Partner,
}

impl Tier {
    /// All tiers in the order they are offered
    pub const ALL: [Tier; 3] = [Tier::Basic, Tier::Trusted, Tier::Partner];

    /// Lowercase identifier used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Basic => "basic",
            Tier::Trusted => "trusted",
            Tier::Partner => "partner",
        }
    }

    /// Get the full display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Tier::Basic => "Basic Tier",
            Tier::Trusted => "Trusted Tier",
            Tier::Partner => "Partner Tier",
        }
    }

    /// Points shown on the tier card
    pub fn points(&self) -> u32 {
        match self {
            Tier::Basic => 5,
            Tier::Trusted => 20,
            Tier::Partner => 50,
        }
    }

    /// Creator reward share in percent, if the tier carries one
    pub fn creator_reward_share(&self) -> Option<Decimal> {
        match self {
            Tier::Basic => None,
            Tier::Trusted => Some(Decimal::new(18, 0)),
            Tier::Partner => Some(Decimal::new(265, 1)),
        }
    }

    pub fn tagline(&self) -> &'static str {
        match self {
            Tier::Basic => "Good for quick predictions",
            Tier::Trusted | Tier::Partner => "Maximum exposure and earnings",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Tier::Basic),
            "trusted" => Ok(Tier::Trusted),
            "partner" => Ok(Tier::Partner),
            _ => Err(format!("Unknown tier: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_tier() {
        assert_eq!("basic".parse::<Tier>(), Ok(Tier::Basic));
        assert_eq!("Trusted".parse::<Tier>(), Ok(Tier::Trusted));
        assert_eq!(" PARTNER ".parse::<Tier>(), Ok(Tier::Partner));
        assert!("gold".parse::<Tier>().is_err());
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        let json = serde_json::to_string(&Tier::Trusted).unwrap();
        assert_eq!(json, "\"trusted\"");

        let tier: Tier = serde_json::from_str("\"partner\"").unwrap();
        assert_eq!(tier, Tier::Partner);
    }

    #[test]
    fn test_tier_card_facts() {
        assert_eq!(Tier::Basic.points(), 5);
        assert_eq!(Tier::Trusted.points(), 20);
        assert_eq!(Tier::Partner.points(), 50);

        assert_eq!(Tier::Basic.creator_reward_share(), None);
        assert_eq!(Tier::Trusted.creator_reward_share(), Some(dec!(18)));
        assert_eq!(Tier::Partner.creator_reward_share(), Some(dec!(26.5)));
    }
}
