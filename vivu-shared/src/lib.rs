pub mod models;
pub mod money;

pub use models::passengers::{PassengerCounts, PassengerTier};
pub use models::service::ServiceType;
pub use money::Vnd;
