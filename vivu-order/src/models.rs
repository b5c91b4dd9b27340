use crate::checkout::{price, CheckoutError, FareQuote, ServicePolicy};
use crate::passengers::{PassengerAction, PassengerSelector};
use crate::validation::ValidationResult;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use vivu_catalog::{CategoryError, FareCategory, FareCategoryBoard};
use vivu_offer::PromotionEvaluator;
use vivu_shared::{PassengerCounts, ServiceType, Vnd};

/// Booking state held by a booking page from mount until checkout.
///
/// Every committed change re-prices the booking; a rejected change leaves
/// the counts, the selected category and the last quote untouched.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub id: Uuid,
    pub service: ServiceType,
    pub base_price: Vnd,
    pub created_at: DateTime<Utc>,
    policy: ServicePolicy,
    board: FareCategoryBoard,
    category: FareCategory,
    promotions: PromotionEvaluator,
    passengers: PassengerSelector,
    as_of: NaiveDate,
    quote: Option<FareQuote>,
}

impl BookingDraft {
    /// Open a draft on the first fare category with seats left.
    pub fn new(
        service: ServiceType,
        base_price: Vnd,
        board: FareCategoryBoard,
        promotions: PromotionEvaluator,
        policy: ServicePolicy,
        as_of: NaiveDate,
    ) -> Result<Self, CheckoutError> {
        let category = board
            .default_selection()
            .cloned()
            .ok_or_else(|| CategoryError::SoldOut(format!("{} categories", service)))?;
        let passengers = PassengerSelector::new(policy.validator(category.available_units));

        let mut draft = Self {
            id: Uuid::new_v4(),
            service,
            base_price,
            created_at: Utc::now(),
            policy,
            board,
            category,
            promotions,
            passengers,
            as_of,
            quote: None,
        };
        draft.recompute();
        Ok(draft)
    }

    pub fn counts(&self) -> PassengerCounts {
        self.passengers.counts()
    }

    pub fn category(&self) -> &FareCategory {
        &self.category
    }

    /// Price shown on the page, absent while the selection is invalid.
    pub fn quote(&self) -> Option<&FareQuote> {
        self.quote.as_ref()
    }

    pub fn last_result(&self) -> &ValidationResult {
        self.passengers.last_result()
    }

    /// Apply a counter press and re-price if it was accepted.
    pub fn dispatch(&mut self, action: PassengerAction) -> ValidationResult {
        let result = self.passengers.dispatch(action).clone();
        if result.valid {
            self.recompute();
        }
        result
    }

    /// Switch fare category. Refused when the category is unknown or sold out,
    /// or when the current party would not fit in it.
    pub fn select_category(&mut self, id: &str) -> Result<(), CheckoutError> {
        let category = self.board.select(id)?.clone();
        let validator = self.policy.validator(category.available_units);
        validator.check(&self.passengers.counts())?;

        self.passengers.revalidate(validator);
        self.category = category;
        self.recompute();
        Ok(())
    }

    /// Move the pricing date, e.g. when the page stays open past midnight.
    pub fn set_as_of(&mut self, as_of: NaiveDate) {
        self.as_of = as_of;
        self.recompute();
    }

    /// Whether the "continue" button is enabled.
    pub fn can_continue(&self) -> bool {
        self.passengers.is_valid() && self.quote.is_some()
    }

    fn recompute(&mut self) {
        let counts = self.passengers.counts();
        self.quote = match price(
            &self.policy,
            self.service,
            self.base_price,
            &self.category,
            &counts,
            &self.promotions,
            self.as_of,
        ) {
            Ok(quote) => Some(quote),
            Err(e) => {
                tracing::warn!(draft = %self.id, error = %e, "Booking draft could not be priced");
                None
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vivu_offer::{Promotion, PromotionKind, PromotionStatus};
    use vivu_shared::PassengerTier;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft() -> BookingDraft {
        let board = FareCategoryBoard::new(vec![
            FareCategory::new("economy", 0, 5),
            FareCategory::new("business", 1_500_000, 2),
            FareCategory::new("first", 4_000_000, 0),
        ]);
        let promotions = PromotionEvaluator::new(vec![Promotion::new(
            PromotionKind::FixedAmount,
            200_000.0,
            PromotionStatus::Active,
            date(2026, 10, 1),
            date(2026, 10, 31),
        )
        .unwrap()]);
        let policy = ServicePolicy {
            tax_rate: 0.0,
            ..ServicePolicy::for_service(ServiceType::Flight)
        };
        BookingDraft::new(ServiceType::Flight, 1_000_000, board, promotions, policy, date(2026, 10, 19)).unwrap()
    }

    #[test]
    fn test_new_draft_is_priced() {
        let draft = draft();

        assert_eq!(draft.category().id, "economy");
        assert_eq!(draft.counts(), PassengerCounts::default());
        let quote = draft.quote().unwrap();
        assert_eq!(quote.breakdown.pre_discount_total, 1_000_000);
        assert_eq!(quote.breakdown.final_total, 800_000);
        assert!(draft.can_continue());
    }

    #[test]
    fn test_dispatch_reprices() {
        let mut draft = draft();

        assert!(draft.dispatch(PassengerAction::Increment(PassengerTier::Child)).valid);
        assert_eq!(draft.quote().unwrap().breakdown.pre_discount_total, 1_750_000);

        let rejected = draft.dispatch(PassengerAction::Decrement(PassengerTier::Adult));
        assert_eq!(rejected.reason.as_deref(), Some("at least one adult required"));
        assert_eq!(draft.quote().unwrap().breakdown.pre_discount_total, 1_750_000);
    }

    #[test]
    fn test_select_category() {
        let mut draft = draft();

        draft.select_category("business").unwrap();
        assert_eq!(draft.quote().unwrap().breakdown.pre_discount_total, 2_500_000);
        assert_eq!(draft.quote().unwrap().breakdown.category_surcharge, 1_500_000);

        assert_eq!(
            draft.select_category("first"),
            Err(CheckoutError::Category(CategoryError::SoldOut("first".to_string())))
        );
        assert_eq!(draft.category().id, "business");
    }

    #[test]
    fn test_category_switch_refused_when_party_does_not_fit() {
        let mut draft = draft();
        draft.dispatch(PassengerAction::Increment(PassengerTier::Adult));
        draft.dispatch(PassengerAction::Increment(PassengerTier::Child));

        let err = draft.select_category("business").unwrap_err();
        assert_eq!(err.to_string(), "only 2 seats available");
        assert_eq!(draft.category().id, "economy");
        assert_eq!(draft.counts(), PassengerCounts::new(2, 1, 0));
    }

    #[test]
    fn test_promotion_expires_with_date() {
        let mut draft = draft();
        draft.set_as_of(date(2026, 11, 1));
        assert_eq!(draft.quote().unwrap().breakdown.final_total, 1_000_000);
    }

    #[test]
    fn test_no_seats_anywhere() {
        let board = FareCategoryBoard::new(vec![FareCategory::new("economy", 0, 0)]);
        let result = BookingDraft::new(
            ServiceType::Transport,
            300_000,
            board,
            PromotionEvaluator::default(),
            ServicePolicy::for_service(ServiceType::Transport),
            date(2026, 10, 19),
        );
        assert!(matches!(result, Err(CheckoutError::Category(CategoryError::SoldOut(_)))));
    }
}
