use axum::{extract::State, Json};
use common::types::{AccrualSnapshot, ApiResponse, CalculatorData};

use crate::state::AppState;

#[utoipa::path(get, path = "/api/calculator-data", tag = "calculator", responses((status = 200, description = "Static calculator record", body = CalculatorData)))]
pub async fn data(State(state): State<AppState>) -> Json<ApiResponse<CalculatorData>> {
    Json(ApiResponse::ok(state.calculator.data().clone()))
}

#[utoipa::path(get, path = "/api/accrual", tag = "calculator", responses((status = 200, description = "Accrued amount as of now", body = AccrualSnapshot)))]
pub async fn accrual(State(state): State<AppState>) -> Json<ApiResponse<AccrualSnapshot>> {
    Json(ApiResponse::ok(state.calculator.snapshot()))
}
