use std::time::Instant;

use chrono::Utc;
use serde_json::{json, Value};
use skill_coach_core::envelope::{
    error_response, normalize_event, success_response, HandlerResponse,
};
use skill_coach_core::error::HandlerError;
use skill_coach_core::generation::{GenerationRequest, GenerationSettings};
use skill_coach_core::model_output::parse_roadmap_output;
use skill_coach_core::prompt::build_roadmap_prompt;
use skill_coach_core::roadmap::{decode_roadmap_event, request_fingerprint, RoadmapResponseBody};

use crate::adapters::text_generation::TextGenerator;
use crate::handlers::Invocation;
use crate::logging::{log_handler_error, log_info};

const COMPONENT: &str = "roadmap_handler";

pub fn handle_roadmap_event(
    event: Value,
    generator: &impl TextGenerator,
    settings: &GenerationSettings,
    invocation: &Invocation,
) -> HandlerResponse {
    match process_roadmap_event(event, generator, settings, invocation) {
        Ok(response) => response,
        Err(error) => {
            log_handler_error(COMPONENT, &invocation.request_id, &error);
            error_response(&error, invocation.invoked_at)
        }
    }
}

fn process_roadmap_event(
    event: Value,
    generator: &impl TextGenerator,
    settings: &GenerationSettings,
    invocation: &Invocation,
) -> Result<HandlerResponse, HandlerError> {
    let payload = normalize_event(event)?;
    let request = decode_roadmap_event(payload)?;
    let level = request.level();
    let fingerprint = request_fingerprint(&request);

    log_info(
        COMPONENT,
        "roadmap_requested",
        json!({
            "request_id": invocation.request_id.clone(),
            "request_fingerprint": fingerprint.clone(),
            "user_level": level,
            "total_solved": request.total_solved,
            "weak_topic_count": request.weak_topics.len(),
            "model_id": settings.model_id.clone(),
        }),
    );

    let prompt = build_roadmap_prompt(&request, level);
    let started_at = Instant::now();
    let raw_output = generator.generate(GenerationRequest {
        prompt: &prompt,
        settings,
    })?;

    log_info(
        COMPONENT,
        "model_invoked",
        json!({
            "request_id": invocation.request_id.clone(),
            "request_fingerprint": fingerprint.clone(),
            "duration_ms": started_at.elapsed().as_millis(),
            "output_chars": raw_output.chars().count(),
        }),
    );

    let roadmap = parse_roadmap_output(&raw_output)?;
    let day_count = roadmap
        .get("roadmap")
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0);

    log_info(
        COMPONENT,
        "roadmap_generated",
        json!({
            "request_id": invocation.request_id.clone(),
            "request_fingerprint": fingerprint,
            "user_level": level,
            "day_count": day_count,
        }),
    );

    success_response(RoadmapResponseBody {
        message: "Learning roadmap generated successfully",
        user_level: level,
        total_solved: request.total_solved,
        weak_topics: &request.weak_topics,
        roadmap: &roadmap,
        generated_at: Utc::now(),
    })
}
