use axum::{body::Bytes, extract::State, Json};
use common::types::ApiResponse;
use serde::Deserialize;
use tracing::info;

use crate::{errors::ApiError, state::AppState};

/// Optional body for increment/decrement. An empty body means `amount = 1`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AmountInput {
    #[serde(default = "default_amount")]
    pub amount: i64,
}

fn default_amount() -> i64 { 1 }

fn parse_amount(body: &Bytes) -> Result<i64, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(default_amount());
    }
    serde_json::from_slice::<AmountInput>(body)
        .map(|a| a.amount)
        .map_err(|e| ApiError::bad_request(format!("invalid amount body: {e}")))
}

#[utoipa::path(get, path = "/api/counter", tag = "counter", responses((status = 200, description = "Current counter value"), (status = 500, description = "Storage failure")))]
pub async fn get_counter(State(state): State<AppState>) -> Result<Json<ApiResponse<i64>>, ApiError> {
    let value = state.object.counter_value().await?;
    Ok(Json(ApiResponse::ok(value)))
}

#[utoipa::path(post, path = "/api/counter/increment", tag = "counter", request_body(content = AmountInput, description = "Optional; amount defaults to 1"), responses((status = 200, description = "New counter value"), (status = 400, description = "Bad Request"), (status = 500, description = "Storage failure")))]
pub async fn increment(State(state): State<AppState>, body: Bytes) -> Result<Json<ApiResponse<i64>>, ApiError> {
    let amount = parse_amount(&body)?;
    let value = state.object.increment(amount).await?;
    info!(amount, value, "counter incremented");
    Ok(Json(ApiResponse::ok(value)))
}

#[utoipa::path(post, path = "/api/counter/decrement", tag = "counter", request_body(content = AmountInput, description = "Optional; amount defaults to 1"), responses((status = 200, description = "New counter value"), (status = 400, description = "Bad Request"), (status = 500, description = "Storage failure")))]
pub async fn decrement(State(state): State<AppState>, body: Bytes) -> Result<Json<ApiResponse<i64>>, ApiError> {
    let amount = parse_amount(&body)?;
    let value = state.object.decrement(amount).await?;
    info!(amount, value, "counter decremented");
    Ok(Json(ApiResponse::ok(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_defaults_to_one() {
        assert_eq!(parse_amount(&Bytes::new()).ok(), Some(1));
        assert_eq!(parse_amount(&Bytes::from_static(b"  \n")).ok(), Some(1));
        assert_eq!(parse_amount(&Bytes::from_static(b"{}")).ok(), Some(1));
    }

    #[test]
    fn explicit_amount_is_used() {
        assert_eq!(parse_amount(&Bytes::from_static(b"{\"amount\": -7}")).ok(), Some(-7));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = parse_amount(&Bytes::from_static(b"{\"amount\": \"lots\"}")).err();
        assert_eq!(err.map(|e| e.status), Some(axum::http::StatusCode::BAD_REQUEST));
    }
}
