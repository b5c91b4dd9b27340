use crate::models::{vietnam_date, Promotion, PromotionKind, RawPromotion};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use vivu_shared::money::{round_vnd, scale};
use vivu_shared::Vnd;

/// Result of applying a promotion to a subtotal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscountOutcome {
    pub discount_amount: Vnd,
    pub discounted_total: Vnd,
}

impl DiscountOutcome {
    pub fn none(total: Vnd) -> Self {
        Self {
            discount_amount: 0,
            discounted_total: total,
        }
    }
}

/// Today's date in Vietnam, for callers that price "now".
pub fn as_of_now() -> NaiveDate {
    vietnam_date(Utc::now())
}

/// Apply a promotion to a pre-discount subtotal.
///
/// Missing, inactive or out-of-window promotions leave the subtotal untouched.
/// The discount never exceeds the subtotal.
pub fn apply_promotion(pre_discount_total: Vnd, promotion: Option<&Promotion>, as_of: NaiveDate) -> DiscountOutcome {
    let promotion = match promotion {
        Some(p) if p.is_applicable(as_of) => p,
        _ => return DiscountOutcome::none(pre_discount_total),
    };

    let discount_amount = match promotion.kind {
        PromotionKind::Percentage => scale(pre_discount_total, promotion.discount_value / 100.0),
        PromotionKind::FixedAmount => round_vnd(promotion.discount_value),
    }
    .min(pre_discount_total);

    DiscountOutcome {
        discount_amount,
        discounted_total: pre_discount_total - discount_amount,
    }
}

/// Turn a backend record into a promotion, or into no promotion at all.
///
/// A malformed record must not break the price display, so it is logged and
/// the customer sees the undiscounted price.
pub fn resolve(raw: Option<&RawPromotion>) -> Option<Promotion> {
    let raw = raw?;
    match Promotion::try_from(raw) {
        Ok(promotion) => Some(promotion),
        Err(e) => {
            tracing::warn!(
                error = %e,
                kind = ?raw.discount_type,
                "Ignoring malformed promotion, pricing without discount"
            );
            None
        }
    }
}

/// [`resolve`] followed by [`apply_promotion`].
pub fn apply_raw_promotion(pre_discount_total: Vnd, raw: Option<&RawPromotion>, as_of: NaiveDate) -> DiscountOutcome {
    let promotion = resolve(raw);
    apply_promotion(pre_discount_total, promotion.as_ref(), as_of)
}

/// Promotions attached to one service item.
#[derive(Debug, Clone, Default)]
pub struct PromotionEvaluator {
    promotions: Vec<Promotion>,
}

impl PromotionEvaluator {
    pub fn new(promotions: Vec<Promotion>) -> Self {
        Self { promotions }
    }

    /// Build from backend records, dropping (and logging) malformed ones.
    pub fn from_raw(records: &[RawPromotion]) -> Self {
        Self::new(records.iter().filter_map(|r| resolve(Some(r))).collect())
    }

    pub fn promotions(&self) -> &[Promotion] {
        &self.promotions
    }

    /// Promotions eligible on `as_of`.
    pub fn applicable(&self, as_of: NaiveDate) -> impl Iterator<Item = &Promotion> {
        self.promotions.iter().filter(move |p| p.is_applicable(as_of))
    }

    /// The eligible promotion giving the largest discount. Ties keep the
    /// earliest promotion in input order.
    pub fn best(&self, pre_discount_total: Vnd, as_of: NaiveDate) -> (Option<&Promotion>, DiscountOutcome) {
        let mut best: (Option<&Promotion>, DiscountOutcome) = (None, DiscountOutcome::none(pre_discount_total));

        for promotion in self.applicable(as_of) {
            let outcome = apply_promotion(pre_discount_total, Some(promotion), as_of);
            if outcome.discount_amount > best.1.discount_amount {
                best = (Some(promotion), outcome);
            }
        }

        best
    }
}
