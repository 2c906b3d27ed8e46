use serde_json::{json, Value};
use skill_coach_core::error::HandlerError;
use tracing_subscriber::EnvFilter;

/// Installs a JSON subscriber for CloudWatch. Filtering follows `RUST_LOG`,
/// defaulting to `info`. CloudWatch adds its own ingestion timestamp.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}

pub fn log_info(component: &str, event: &str, details: Value) {
    tracing::info!(component = component, event = event, details = %details);
}

pub fn log_warn(component: &str, event: &str, details: Value) {
    tracing::warn!(component = component, event = event, details = %details);
}

pub fn log_error(component: &str, event: &str, details: Value) {
    tracing::error!(component = component, event = event, details = %details);
}

/// Records a handler failure with its full cause. This is the only place
/// upstream detail and raw model output are written.
pub fn log_handler_error(component: &str, request_id: &str, error: &HandlerError) {
    let status_code = error.status_code();
    match error {
        HandlerError::Validation(validation) => log_warn(
            component,
            "request_rejected",
            json!({
                "request_id": request_id,
                "status_code": status_code,
                "error": validation.message(),
            }),
        ),
        HandlerError::NotFound(message) => log_info(
            component,
            "record_not_found",
            json!({
                "request_id": request_id,
                "status_code": status_code,
                "error": message,
            }),
        ),
        HandlerError::Upstream(upstream) => log_error(
            component,
            "upstream_failed",
            json!({
                "request_id": request_id,
                "status_code": status_code,
                "error": upstream.to_string(),
            }),
        ),
        HandlerError::MalformedModelOutput { reason, raw_output } => log_error(
            component,
            "model_output_malformed",
            json!({
                "request_id": request_id,
                "status_code": status_code,
                "error": reason,
                "raw_output": raw_output,
            }),
        ),
        HandlerError::ResponseEncoding(detail) => log_error(
            component,
            "response_encoding_failed",
            json!({
                "request_id": request_id,
                "status_code": status_code,
                "error": detail,
            }),
        ),
    }
}
