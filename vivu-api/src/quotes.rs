use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use vivu_order::{quote, FareQuote, FareQuoteRequest};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateQuoteRequest {
    #[serde(flatten)]
    pub request: FareQuoteRequest,
    /// Pricing date; defaults to today in Vietnam.
    pub as_of: Option<NaiveDate>,
}

/// POST /v1/quotes
/// Price a booking selection for display on the booking page
pub async fn create_quote(
    State(state): State<AppState>,
    Json(req): Json<CreateQuoteRequest>,
) -> Result<Json<FareQuote>, AppError> {
    let as_of = req.as_of.unwrap_or_else(vivu_offer::as_of_now);
    let policy = state.policy(req.request.service);

    let quote = quote(&policy, &req.request, as_of).map_err(|e| {
        if e.is_user_correctable() {
            tracing::info!(service = %req.request.service, error = %e, "Quote rejected");
        } else {
            tracing::warn!(service = %req.request.service, error = %e, "Quote failed");
        }
        AppError::from(e)
    })?;

    Ok(Json(quote))
}
