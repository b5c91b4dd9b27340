use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use vivu_order::{reduce, PassengerAction, ValidationResult};
use vivu_shared::{PassengerCounts, ServiceType};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub service: ServiceType,
    pub counts: PassengerCounts,
    pub action: PassengerAction,
    /// Seats left on the selected fare category.
    pub capacity: u32,
}

#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub counts: PassengerCounts,
    #[serde(flatten)]
    pub result: ValidationResult,
}

/// POST /v1/passengers/transition
/// Apply one counter press; rejected presses return the counts unchanged
pub async fn transition(
    State(state): State<AppState>,
    Json(req): Json<TransitionRequest>,
) -> Json<TransitionResponse> {
    let validator = state.policy(req.service).validator(req.capacity);

    let response = match reduce(req.counts, req.action, &validator) {
        Ok(counts) => TransitionResponse {
            counts,
            result: ValidationResult::ok(),
        },
        Err(violation) => TransitionResponse {
            counts: req.counts,
            result: ValidationResult::rejected(violation.to_string()),
        },
    };

    Json(response)
}
