use serde::{Deserialize, Serialize};
use vivu_shared::{PassengerCounts, PassengerTier};

/// Per-booking ceilings for adults and children.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountLimits {
    pub adults: u32,
    pub children: u32,
}

impl Default for CountLimits {
    fn default() -> Self {
        Self { adults: 9, children: 9 }
    }
}

/// Why a set of passenger counts was refused.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CountViolation {
    #[error("at least one adult required")]
    AdultRequired,

    #[error("each infant must travel with an adult")]
    InfantsExceedAdults,

    #[error("at most {max} adults per booking")]
    TooManyAdults { max: u32 },

    #[error("at most {max} children per booking")]
    TooManyChildren { max: u32 },

    #[error("only {capacity} seats available")]
    CapacityExceeded { requested: u32, capacity: u32 },

    #[error("no {} to remove", .0.plural())]
    NothingToRemove(PassengerTier),
}

impl CountViolation {
    /// Stable identifier for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            CountViolation::CapacityExceeded { .. } => "capacity_exceeded",
            _ => "invalid_passenger_count",
        }
    }
}

/// Outcome of a count check, shaped for inline display next to the counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub reason: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self { valid: true, reason: None }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

impl From<Result<(), CountViolation>> for ValidationResult {
    fn from(result: Result<(), CountViolation>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(violation) => Self::rejected(violation.to_string()),
        }
    }
}

/// Checks passenger counts against the ratio rules, the per-tier ceilings and
/// the seats left on the bookable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassengerCountValidator {
    pub capacity: u32,
    pub limits: CountLimits,
}

impl PassengerCountValidator {
    pub fn new(capacity: u32, limits: CountLimits) -> Self {
        Self { capacity, limits }
    }

    /// First rule the counts break, if any.
    pub fn check(&self, counts: &PassengerCounts) -> Result<(), CountViolation> {
        self.check_ratios(counts)?;
        if counts.adults > self.limits.adults {
            return Err(CountViolation::TooManyAdults { max: self.limits.adults });
        }
        if counts.children > self.limits.children {
            return Err(CountViolation::TooManyChildren { max: self.limits.children });
        }
        let requested = counts.total();
        if requested > self.capacity {
            return Err(CountViolation::CapacityExceeded {
                requested,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Only the adult/infant rules, ignoring ceilings and seats.
    pub fn check_ratios(&self, counts: &PassengerCounts) -> Result<(), CountViolation> {
        if counts.adults == 0 && counts.total() > 0 {
            return Err(CountViolation::AdultRequired);
        }
        if counts.infants > counts.adults {
            return Err(CountViolation::InfantsExceedAdults);
        }
        Ok(())
    }

    pub fn validate(&self, counts: &PassengerCounts) -> ValidationResult {
        self.check(counts).into()
    }
}

pub fn validate_counts(counts: &PassengerCounts, capacity: u32, per_category_max: CountLimits) -> ValidationResult {
    PassengerCountValidator::new(capacity, per_category_max).validate(counts)
}
