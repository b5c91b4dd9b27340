use serde::{Deserialize, Serialize};
use std::fmt;

/// Bookable service families that price per passenger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Flight,
    Tour,
    Transport,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [ServiceType::Flight, ServiceType::Tour, ServiceType::Transport];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Flight => "flight",
            ServiceType::Tour => "tour",
            ServiceType::Transport => "transport",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
