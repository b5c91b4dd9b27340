pub mod fare_category;
pub mod pricing;

pub use fare_category::{CategoryError, FareCategory, FareCategoryBoard};
pub use pricing::{compute_fare, FareBreakdown, FareError, TierMultipliers};
