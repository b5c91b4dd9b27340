use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vivu_shared::money::{round_vnd, scale};
use vivu_shared::{PassengerCounts, PassengerTier, ServiceType, Vnd};

/// Largest amount the engine prices. Fares are scaled through `f64`, which
/// holds every integer up to 2^53 exactly.
pub const MAX_FARE: Vnd = 1 << 53;

/// Price fractions charged to non-adult passengers. Adults always pay the full fare.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TierMultipliers {
    pub child: f64,
    pub infant: f64,
}

impl TierMultipliers {
    pub fn new(child: f64, infant: f64) -> Result<Self, FareError> {
        let multipliers = Self { child, infant };
        multipliers.validate()?;
        Ok(multipliers)
    }

    /// Fractions the booking pages charge today for each service family.
    pub fn for_service(service: ServiceType) -> Self {
        match service {
            ServiceType::Flight => Self { child: 0.75, infant: 0.25 },
            ServiceType::Tour => Self { child: 0.75, infant: 0.0 },
            ServiceType::Transport => Self { child: 0.70, infant: 0.0 },
        }
    }

    pub fn get(&self, tier: PassengerTier) -> f64 {
        match tier {
            PassengerTier::Adult => 1.0,
            PassengerTier::Child => self.child,
            PassengerTier::Infant => self.infant,
        }
    }

    /// Both fractions must be finite and within `[0, 1]`.
    pub fn validate(&self) -> Result<(), FareError> {
        for (tier, value) in [(PassengerTier::Child, self.child), (PassengerTier::Infant, self.infant)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(FareError::InvalidMultiplier { tier, value });
            }
        }
        Ok(())
    }
}

/// Itemized price of a booking.
///
/// Produced by [`compute_fare`] and refined by the discount and tax steps,
/// each of which returns a new breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FareBreakdown {
    /// Share of the pre-discount total that comes from the base fare.
    pub base_subtotal: Vnd,
    /// Share of the pre-discount total that comes from the fare-category surcharge.
    pub category_surcharge: Vnd,
    /// Subtotal per passenger tier, only for tiers with at least one passenger.
    pub per_category_totals: BTreeMap<PassengerTier, Vnd>,
    pub pre_discount_total: Vnd,
    pub discount_amount: Vnd,
    pub tax_amount: Vnd,
    pub final_total: Vnd,
}

impl FareBreakdown {
    /// Breakdown with the given discount applied. The discount is capped at the
    /// pre-discount total and any previously applied tax is dropped.
    pub fn discounted(self, discount_amount: Vnd) -> Self {
        let discount_amount = discount_amount.min(self.pre_discount_total);
        Self {
            discount_amount,
            tax_amount: 0,
            final_total: self.pre_discount_total - discount_amount,
            ..self
        }
    }

    /// Total after discount, before tax.
    pub fn discounted_total(&self) -> Vnd {
        self.pre_discount_total.saturating_sub(self.discount_amount)
    }

    /// Breakdown with a flat tax rate levied on the discounted total.
    pub fn taxed(self, tax_rate: f64) -> Self {
        let discounted_total = self.discounted_total();
        let tax_amount = if tax_rate > 0.0 { scale(discounted_total, tax_rate) } else { 0 };
        Self {
            tax_amount,
            final_total: discounted_total.saturating_add(tax_amount),
            ..self
        }
    }

    pub fn tier_total(&self, tier: PassengerTier) -> Vnd {
        self.per_category_totals.get(&tier).copied().unwrap_or(0)
    }
}

/// Compute the undiscounted, untaxed fare for a group of passengers.
///
/// Each tier is priced as `(base_price + category_surcharge) × multiplier × count`
/// and rounded to whole đồng on its own before the tiers are summed.
pub fn compute_fare(
    base_price: Vnd,
    category_surcharge: Vnd,
    counts: &PassengerCounts,
    multipliers: &TierMultipliers,
) -> Result<FareBreakdown, FareError> {
    multipliers.validate()?;
    if !counts.is_consistent() {
        return Err(FareError::InvalidPassengerCount(*counts));
    }

    let unit_price = base_price
        .checked_add(category_surcharge)
        .filter(|price| *price <= MAX_FARE)
        .ok_or(FareError::AmountOverflow)?;
    let mut per_category_totals = BTreeMap::new();
    let mut pre_discount_total: Vnd = 0;
    let mut base_subtotal: Vnd = 0;

    for tier in PassengerTier::ALL {
        let count = counts.get(tier);
        if count == 0 {
            continue;
        }
        let factor = multipliers.get(tier) * count as f64;
        let tier_total = round_vnd(unit_price as f64 * factor);
        base_subtotal = checked_sum(base_subtotal, round_vnd(base_price as f64 * factor))?;
        pre_discount_total = checked_sum(pre_discount_total, tier_total)?;
        per_category_totals.insert(tier, tier_total);
    }

    tracing::debug!(
        base_price,
        category_surcharge,
        passengers = counts.total(),
        pre_discount_total,
        "Computed fare"
    );

    Ok(FareBreakdown {
        base_subtotal,
        category_surcharge: pre_discount_total.saturating_sub(base_subtotal),
        per_category_totals,
        pre_discount_total,
        discount_amount: 0,
        tax_amount: 0,
        final_total: pre_discount_total,
    })
}

fn checked_sum(total: Vnd, amount: Vnd) -> Result<Vnd, FareError> {
    total
        .checked_add(amount)
        .filter(|sum| *sum <= MAX_FARE)
        .ok_or(FareError::AmountOverflow)
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FareError {
    #[error("Invalid {tier} multiplier: {value} (expected a fraction between 0 and 1)")]
    InvalidMultiplier { tier: PassengerTier, value: f64 },

    #[error("Invalid passenger counts: {0:?}")]
    InvalidPassengerCount(PassengerCounts),

    #[error("Fare exceeds the largest priceable amount ({MAX_FARE} VND)")]
    AmountOverflow,
}
