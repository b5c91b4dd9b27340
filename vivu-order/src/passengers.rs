use crate::validation::{CountViolation, PassengerCountValidator, ValidationResult};
use serde::{Deserialize, Serialize};
use vivu_shared::{PassengerCounts, PassengerTier};

/// A counter button press on the booking page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "tier", rename_all = "snake_case")]
pub enum PassengerAction {
    Increment(PassengerTier),
    Decrement(PassengerTier),
}

/// Next counts after `action`, or the rule the transition would break.
///
/// Increments are checked against every rule. Decrements only against the
/// adult/infant ratio, so a party that no longer fits can always shrink.
/// Never partially applies an action: on error the caller keeps `counts`.
pub fn reduce(
    counts: PassengerCounts,
    action: PassengerAction,
    validator: &PassengerCountValidator,
) -> Result<PassengerCounts, CountViolation> {
    match action {
        PassengerAction::Increment(tier) => {
            let next = counts.with(tier, counts.get(tier).saturating_add(1));
            validator.check(&next)?;
            Ok(next)
        }
        PassengerAction::Decrement(tier) => {
            let current = counts.get(tier);
            if tier == PassengerTier::Adult && current <= 1 {
                return Err(CountViolation::AdultRequired);
            }
            if current == 0 {
                return Err(CountViolation::NothingToRemove(tier));
            }
            let next = counts.with(tier, current - 1);
            validator.check_ratios(&next)?;
            Ok(next)
        }
    }
}

/// Passenger counters owned by a booking page.
///
/// Counts only move through [`PassengerSelector::dispatch`]; a rejected action
/// leaves them as they were and records the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassengerSelector {
    counts: PassengerCounts,
    validator: PassengerCountValidator,
    last_result: ValidationResult,
}

impl PassengerSelector {
    pub fn new(validator: PassengerCountValidator) -> Self {
        Self::with_counts(PassengerCounts::default(), validator)
    }

    pub fn with_counts(counts: PassengerCounts, validator: PassengerCountValidator) -> Self {
        let last_result = validator.validate(&counts);
        Self {
            counts,
            validator,
            last_result,
        }
    }

    pub fn counts(&self) -> PassengerCounts {
        self.counts
    }

    /// Result of the most recent action or capacity change.
    pub fn last_result(&self) -> &ValidationResult {
        &self.last_result
    }

    /// Whether the current counts satisfy every rule.
    pub fn is_valid(&self) -> bool {
        self.validator.check(&self.counts).is_ok()
    }

    pub fn dispatch(&mut self, action: PassengerAction) -> &ValidationResult {
        self.last_result = match reduce(self.counts, action, &self.validator) {
            Ok(next) => {
                self.counts = next;
                ValidationResult::ok()
            }
            Err(violation) => {
                tracing::debug!(?action, counts = ?self.counts, %violation, "Rejected passenger change");
                ValidationResult::rejected(violation.to_string())
            }
        };
        &self.last_result
    }

    /// Swap in a new validator (e.g. another fare category with fewer seats)
    /// and re-check the current counts against it.
    pub fn revalidate(&mut self, validator: PassengerCountValidator) -> &ValidationResult {
        self.validator = validator;
        self.last_result = validator.validate(&self.counts);
        &self.last_result
    }
}
