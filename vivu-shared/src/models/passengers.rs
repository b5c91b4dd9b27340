use serde::{Deserialize, Serialize};
use std::fmt;

/// Age-based pricing class of a passenger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PassengerTier {
    Adult,
    Child,
    Infant,
}

impl PassengerTier {
    pub const ALL: [PassengerTier; 3] = [PassengerTier::Adult, PassengerTier::Child, PassengerTier::Infant];

    /// Plural noun used in user-facing messages.
    pub fn plural(&self) -> &'static str {
        match self {
            PassengerTier::Adult => "adults",
            PassengerTier::Child => "children",
            PassengerTier::Infant => "infants",
        }
    }
}

impl fmt::Display for PassengerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PassengerTier::Adult => "adult",
            PassengerTier::Child => "child",
            PassengerTier::Infant => "infant",
        };
        f.write_str(name)
    }
}

/// Passenger counts for one booking.
///
/// A plain value: callers replace it wholesale rather than mutating fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PassengerCounts {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl Default for PassengerCounts {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            infants: 0,
        }
    }
}

impl PassengerCounts {
    pub fn new(adults: u32, children: u32, infants: u32) -> Self {
        Self {
            adults,
            children,
            infants,
        }
    }

    pub fn get(&self, tier: PassengerTier) -> u32 {
        match tier {
            PassengerTier::Adult => self.adults,
            PassengerTier::Child => self.children,
            PassengerTier::Infant => self.infants,
        }
    }

    /// Copy of these counts with one tier replaced.
    pub fn with(self, tier: PassengerTier, count: u32) -> Self {
        let mut next = self;
        match tier {
            PassengerTier::Adult => next.adults = count,
            PassengerTier::Child => next.children = count,
            PassengerTier::Infant => next.infants = count,
        }
        next
    }

    /// Every passenger on the booking, infants included. Saturates instead of
    /// wrapping so absurd counts still fail capacity checks.
    pub fn total(&self) -> u32 {
        self.adults.saturating_add(self.children).saturating_add(self.infants)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Structural invariants every booking must satisfy: an adult is present
    /// whenever anyone is, and no adult carries more than one infant.
    pub fn is_consistent(&self) -> bool {
        (self.is_empty() || self.adults >= 1) && self.infants <= self.adults
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_single_adult() {
        let counts = PassengerCounts::default();
        assert_eq!(counts, PassengerCounts::new(1, 0, 0));
        assert_eq!(counts.total(), 1);
    }

    #[test]
    fn test_with_replaces_one_tier() {
        let counts = PassengerCounts::new(2, 1, 0).with(PassengerTier::Infant, 2);
        assert_eq!(counts, PassengerCounts::new(2, 1, 2));
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn test_total_saturates() {
        let counts = PassengerCounts::new(0, u32::MAX, 1);
        assert_eq!(counts.total(), u32::MAX);
        assert!(!counts.is_empty());
        assert!(!counts.is_consistent());
    }

    #[test]
    fn test_consistency() {
        assert!(PassengerCounts::new(0, 0, 0).is_consistent());
        assert!(PassengerCounts::new(2, 3, 2).is_consistent());
        assert!(!PassengerCounts::new(0, 1, 0).is_consistent());
        assert!(!PassengerCounts::new(1, 0, 2).is_consistent());
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(PassengerCounts::new(2, 1, 1)).unwrap();
        assert_eq!(json, serde_json::json!({"adults": 2, "children": 1, "infants": 1}));
        let tier: PassengerTier = serde_json::from_str("\"infant\"").unwrap();
        assert_eq!(tier, PassengerTier::Infant);
    }
}
