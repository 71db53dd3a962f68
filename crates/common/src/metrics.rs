use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static OBJECT_OPS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "clock_object_operations_total",
        "Operations applied to the global object, by operation",
        &["op"]
    )
    .expect("register object_operations_total")
});

pub static STORAGE_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "clock_storage_errors_total",
        "Failed storage calls, by storage operation",
        &["op"]
    )
    .expect("register storage_errors_total")
});

pub fn record_op(op: &str) {
    OBJECT_OPS_TOTAL.with_label_values(&[op]).inc();
}

pub fn record_storage_error(op: &str) {
    STORAGE_ERRORS_TOTAL.with_label_values(&[op]).inc();
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_ops_show_up_in_text_output() {
        record_op("test_probe");
        let (status, body) = encode_metrics();
        assert_eq!(status, axum::http::StatusCode::OK);
        assert!(body.contains("clock_object_operations_total"));
        assert!(body.contains("op=\"test_probe\""));
    }
}
