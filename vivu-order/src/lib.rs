pub mod checkout;
pub mod models;
pub mod passengers;
pub mod validation;

pub use checkout::{quote, CheckoutError, FareQuote, FareQuoteRequest, ServicePolicy};
pub use models::BookingDraft;
pub use passengers::{reduce, PassengerAction, PassengerSelector};
pub use validation::{validate_counts, CountLimits, CountViolation, PassengerCountValidator, ValidationResult};
