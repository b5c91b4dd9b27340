pub mod evaluator;
pub mod models;

pub use evaluator::{apply_promotion, apply_raw_promotion, as_of_now, resolve, DiscountOutcome, PromotionEvaluator};
pub use models::{Promotion, PromotionKind, PromotionParseError, PromotionStatus, RawPromotion};
