use serde_json::{json, Value};
use skill_coach_core::envelope::{
    error_response, normalize_event, success_response, HandlerResponse,
};
use skill_coach_core::error::HandlerError;
use skill_coach_core::profile::{
    decode_profile_event, ProfileData, ProfileRequest, ProfileResponseBody, ProfileUpsert,
};

use crate::adapters::profile_store::ProfileRepository;
use crate::handlers::Invocation;
use crate::logging::{log_handler_error, log_info};

const COMPONENT: &str = "profile_handler";

/// Handles one `store_profile` / `get_profile` event. Every failure is turned
/// into an error envelope here; nothing propagates to the runtime.
pub fn handle_profile_event(
    event: Value,
    store: &impl ProfileRepository,
    invocation: &Invocation,
) -> HandlerResponse {
    match process_profile_event(event, store, invocation) {
        Ok(response) => response,
        Err(error) => {
            log_handler_error(COMPONENT, &invocation.request_id, &error);
            error_response(&error, invocation.invoked_at)
        }
    }
}

fn process_profile_event(
    event: Value,
    store: &impl ProfileRepository,
    invocation: &Invocation,
) -> Result<HandlerResponse, HandlerError> {
    let payload = normalize_event(event)?;
    let request = decode_profile_event(payload)?;

    log_info(
        COMPONENT,
        "profile_request_received",
        json!({
            "request_id": invocation.request_id.clone(),
            "operation": request.operation(),
            "user_id": request.user_id(),
        }),
    );

    match request {
        ProfileRequest::StoreProfile { user_id, data } => {
            store_profile(user_id, data, store, invocation)
        }
        ProfileRequest::GetProfile { user_id } => get_profile(&user_id, store, invocation),
    }
}

fn store_profile(
    user_id: String,
    data: ProfileData,
    store: &impl ProfileRepository,
    invocation: &Invocation,
) -> Result<HandlerResponse, HandlerError> {
    let upsert = ProfileUpsert {
        user_id,
        data,
        written_at: invocation.invoked_at,
    };
    let profile = store.upsert_profile(&upsert)?;

    log_info(
        COMPONENT,
        "profile_stored",
        json!({
            "request_id": invocation.request_id.clone(),
            "user_id": profile.user_id.clone(),
            "weak_topic_count": profile.weak_topics.len(),
            "total_solved": profile.total_solved,
            "first_write": profile.created_at == profile.updated_at,
        }),
    );

    success_response(ProfileResponseBody {
        message: "Profile stored successfully",
        user_id: &profile.user_id,
        profile: &profile,
    })
}

fn get_profile(
    user_id: &str,
    store: &impl ProfileRepository,
    invocation: &Invocation,
) -> Result<HandlerResponse, HandlerError> {
    let profile = store.fetch_profile(user_id)?.ok_or_else(|| {
        HandlerError::NotFound(format!("Profile not found for user_id: {user_id}"))
    })?;

    log_info(
        COMPONENT,
        "profile_retrieved",
        json!({
            "request_id": invocation.request_id.clone(),
            "user_id": user_id,
        }),
    );

    success_response(ProfileResponseBody {
        message: "Profile retrieved successfully",
        user_id,
        profile: &profile,
    })
}
