use crate::validation::{CountLimits, CountViolation, PassengerCountValidator};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use vivu_catalog::{compute_fare, CategoryError, FareBreakdown, FareCategory, FareError, TierMultipliers};
use vivu_offer::{Promotion, PromotionEvaluator, RawPromotion};
use vivu_shared::{PassengerCounts, ServiceType, Vnd};

/// Pricing rules that differ between flights, tours and ground transport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ServicePolicy {
    pub multipliers: TierMultipliers,
    /// Flat tax levied on the discounted total, e.g. `0.05` for 5%.
    pub tax_rate: f64,
    pub limits: CountLimits,
}

impl ServicePolicy {
    pub fn new(multipliers: TierMultipliers, tax_rate: f64, limits: CountLimits) -> Result<Self, CheckoutError> {
        multipliers.validate()?;
        if !tax_rate.is_finite() || tax_rate < 0.0 {
            return Err(CheckoutError::InvalidTaxRate(tax_rate));
        }
        Ok(Self {
            multipliers,
            tax_rate,
            limits,
        })
    }

    pub fn for_service(service: ServiceType) -> Self {
        let multipliers = TierMultipliers::for_service(service);
        match service {
            ServiceType::Flight => Self {
                multipliers,
                tax_rate: 0.05,
                limits: CountLimits { adults: 9, children: 9 },
            },
            ServiceType::Tour => Self {
                multipliers,
                tax_rate: 0.0,
                limits: CountLimits { adults: 20, children: 20 },
            },
            ServiceType::Transport => Self {
                multipliers,
                tax_rate: 0.0,
                limits: CountLimits { adults: 10, children: 10 },
            },
        }
    }

    pub fn validator(&self, capacity: u32) -> PassengerCountValidator {
        PassengerCountValidator::new(capacity, self.limits)
    }
}

/// Everything a booking page knows when it asks for a price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareQuoteRequest {
    pub service: ServiceType,
    pub base_price: Vnd,
    pub category: FareCategory,
    pub counts: PassengerCounts,
    #[serde(default)]
    pub promotions: Vec<RawPromotion>,
}

/// A priced booking together with the promotion that produced its discount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FareQuote {
    pub service: ServiceType,
    pub category_id: String,
    pub counts: PassengerCounts,
    pub breakdown: FareBreakdown,
    pub applied_promotion: Option<Promotion>,
}

/// Price a booking: check the category and counts, compute the tiered fare,
/// apply the best eligible promotion, then tax the discounted total.
pub fn quote(policy: &ServicePolicy, request: &FareQuoteRequest, as_of: NaiveDate) -> Result<FareQuote, CheckoutError> {
    let promotions = PromotionEvaluator::from_raw(&request.promotions);
    price(
        policy,
        request.service,
        request.base_price,
        &request.category,
        &request.counts,
        &promotions,
        as_of,
    )
}

/// Shared by [`quote`] and the booking draft, which keeps its promotions resolved.
pub(crate) fn price(
    policy: &ServicePolicy,
    service: ServiceType,
    base_price: Vnd,
    category: &FareCategory,
    counts: &PassengerCounts,
    promotions: &PromotionEvaluator,
    as_of: NaiveDate,
) -> Result<FareQuote, CheckoutError> {
    category.ensure_selectable()?;
    policy.validator(category.available_units).check(counts)?;

    let fare = compute_fare(base_price, category.base_price_delta, counts, &policy.multipliers)?;
    let (promotion, discount) = promotions.best(fare.pre_discount_total, as_of);
    let breakdown = fare.discounted(discount.discount_amount).taxed(policy.tax_rate);

    tracing::debug!(
        %service,
        category = %category.id,
        pre_discount_total = breakdown.pre_discount_total,
        discount = breakdown.discount_amount,
        tax = breakdown.tax_amount,
        final_total = breakdown.final_total,
        "Priced booking"
    );

    Ok(FareQuote {
        service,
        category_id: category.id.clone(),
        counts: *counts,
        breakdown,
        applied_promotion: promotion.cloned(),
    })
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CheckoutError {
    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error(transparent)]
    InvalidPassengers(#[from] CountViolation),

    #[error(transparent)]
    Fare(#[from] FareError),

    #[error("Invalid tax rate: {0}")]
    InvalidTaxRate(f64),
}

impl CheckoutError {
    /// Whether the customer can fix this by changing their selection.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, CheckoutError::Category(_) | CheckoutError::InvalidPassengers(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vivu_shared::PassengerTier;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(counts: PassengerCounts, promotions: serde_json::Value) -> FareQuoteRequest {
        FareQuoteRequest {
            service: ServiceType::Flight,
            base_price: 1_000_000,
            category: FareCategory::new("economy", 0, 50),
            counts,
            promotions: serde_json::from_value(promotions).unwrap(),
        }
    }

    fn ten_percent() -> serde_json::Value {
        serde_json::json!([{
            "discount_type": "percentage",
            "discount_value": 10,
            "status": "active",
            "start_date": "2026-10-01",
            "end_date": "2026-10-31"
        }])
    }

    #[test]
    fn test_single_adult_without_promotion() {
        let policy = ServicePolicy { tax_rate: 0.0, ..ServicePolicy::for_service(ServiceType::Flight) };
        let quote = quote(&policy, &request(PassengerCounts::default(), serde_json::json!([])), date(2026, 10, 19)).unwrap();

        assert_eq!(quote.breakdown.final_total, 1_000_000);
        assert!(quote.applied_promotion.is_none());
    }

    #[test]
    fn test_flight_family_with_promotion_and_tax() {
        let policy = ServicePolicy::for_service(ServiceType::Flight);
        let quote = quote(&policy, &request(PassengerCounts::new(2, 1, 1), ten_percent()), date(2026, 10, 19)).unwrap();
        let b = &quote.breakdown;

        assert_eq!(b.tier_total(PassengerTier::Adult), 2_000_000);
        assert_eq!(b.tier_total(PassengerTier::Child), 750_000);
        assert_eq!(b.tier_total(PassengerTier::Infant), 250_000);
        assert_eq!(b.pre_discount_total, 3_000_000);
        assert_eq!(b.discount_amount, 300_000);
        // 5% of the discounted 2.7M
        assert_eq!(b.tax_amount, 135_000);
        assert_eq!(b.final_total, 2_835_000);
        assert!(quote.applied_promotion.is_some());
    }

    #[test]
    fn test_expired_promotion_is_ignored() {
        let policy = ServicePolicy::for_service(ServiceType::Tour);
        let mut req = request(PassengerCounts::new(2, 1, 1), ten_percent());
        req.service = ServiceType::Tour;

        let quote = quote(&policy, &req, date(2026, 11, 1)).unwrap();

        // tours charge infants nothing and carry no tax
        assert_eq!(quote.breakdown.pre_discount_total, 2_750_000);
        assert_eq!(quote.breakdown.discount_amount, 0);
        assert_eq!(quote.breakdown.final_total, 2_750_000);
        assert_eq!(quote.breakdown.tier_total(PassengerTier::Infant), 0);
    }

    #[test]
    fn test_malformed_promotion_prices_without_discount() {
        let policy = ServicePolicy { tax_rate: 0.0, ..ServicePolicy::for_service(ServiceType::Transport) };
        let promotions = serde_json::json!([{
            "discount_type": "percentage",
            "discount_value": 10,
            "status": "active",
            "start_date": "yesterday",
            "end_date": "2026-10-31"
        }]);

        let quote = quote(&policy, &request(PassengerCounts::new(1, 1, 0), promotions), date(2026, 10, 19)).unwrap();

        assert_eq!(quote.breakdown.pre_discount_total, 1_700_000);
        assert_eq!(quote.breakdown.final_total, 1_700_000);
        assert!(quote.applied_promotion.is_none());
    }

    #[test]
    fn test_rejects_sold_out_and_invalid_counts() {
        let policy = ServicePolicy::for_service(ServiceType::Flight);
        let as_of = date(2026, 10, 19);

        let mut sold_out = request(PassengerCounts::default(), serde_json::json!([]));
        sold_out.category.available_units = 0;
        assert_eq!(
            quote(&policy, &sold_out, as_of),
            Err(CheckoutError::Category(CategoryError::SoldOut("economy".to_string())))
        );

        let mut full = request(PassengerCounts::new(3, 0, 0), serde_json::json!([]));
        full.category.available_units = 2;
        let err = quote(&policy, &full, as_of).unwrap_err();
        assert_eq!(err, CheckoutError::InvalidPassengers(CountViolation::CapacityExceeded { requested: 3, capacity: 2 }));
        assert!(err.is_user_correctable());

        let orphan = request(PassengerCounts::new(0, 1, 0), serde_json::json!([]));
        assert_eq!(
            quote(&policy, &orphan, as_of).unwrap_err().to_string(),
            "at least one adult required"
        );
    }

    #[test]
    fn test_policy_validation() {
        let multipliers = TierMultipliers::for_service(ServiceType::Flight);
        assert!(ServicePolicy::new(multipliers, 0.05, CountLimits::default()).is_ok());
        assert_eq!(
            ServicePolicy::new(multipliers, -0.1, CountLimits::default()),
            Err(CheckoutError::InvalidTaxRate(-0.1))
        );
        let bad = TierMultipliers { child: 2.0, infant: 0.0 };
        assert!(matches!(
            ServicePolicy::new(bad, 0.0, CountLimits::default()),
            Err(CheckoutError::Fare(FareError::InvalidMultiplier { .. }))
        ));
    }
}
