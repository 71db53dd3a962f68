use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Uniform JSON envelope returned by every `/api/*` route.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(msg.into()) }
    }
}

/// One record of the demo item collection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct DemoItem {
    pub id: String,
    pub name: String,
    pub value: f64,
}

impl DemoItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, value: f64) -> Self {
        Self { id: id.into(), name: name.into(), value }
    }
}

/// Partial update for a [`DemoItem`]; absent fields are left untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, ToSchema)]
pub struct DemoItemPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
}

/// Static record the front page uses to drive the accrual clock.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorData {
    pub annual_salary: f64,
    /// ISO 8601 instant, e.g. `2024-11-11T09:00:00Z`
    pub start_date: String,
    pub person_name: String,
    pub image_url: String,
    pub context_text: String,
}

/// Point-in-time view of the accrued amount.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccrualSnapshot {
    pub as_of: String,
    pub elapsed_seconds: f64,
    pub per_second: f64,
    pub per_hour: f64,
    pub per_day: f64,
    pub accrued: f64,
    pub accrued_display: String,
}
