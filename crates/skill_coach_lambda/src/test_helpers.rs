//! In-process stand-ins for the boundary services.
//!
//! These back the handler tests and can also drive the handlers locally
//! without AWS credentials.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::json;
use skill_coach_core::error::UpstreamError;
use skill_coach_core::generation::GenerationRequest;
use skill_coach_core::profile::{ProfileUpsert, UserSkillProfile};

use crate::adapters::profile_store::ProfileRepository;
use crate::adapters::text_generation::TextGenerator;

/// Map-backed store with the same upsert semantics as the DynamoDB adapter.
#[derive(Default)]
pub struct InMemoryProfileStore {
    records: Mutex<HashMap<String, UserSkillProfile>>,
    calls: AtomicUsize,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: UserSkillProfile) -> Self {
        let store = Self::new();
        store
            .records
            .lock()
            .expect("poisoned mutex")
            .insert(profile.user_id.clone(), profile);
        store
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn record(&self, user_id: &str) -> Option<UserSkillProfile> {
        self.records
            .lock()
            .expect("poisoned mutex")
            .get(user_id)
            .cloned()
    }
}

impl ProfileRepository for InMemoryProfileStore {
    fn upsert_profile(&self, upsert: &ProfileUpsert) -> Result<UserSkillProfile, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().expect("poisoned mutex");
        let profile = upsert.apply(records.get(&upsert.user_id));
        records.insert(profile.user_id.clone(), profile.clone());
        Ok(profile)
    }

    fn fetch_profile(&self, user_id: &str) -> Result<Option<UserSkillProfile>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.record(user_id))
    }
}

/// Store whose every call fails with the given detail.
pub struct FailingProfileStore {
    detail: String,
    calls: AtomicUsize,
}

impl FailingProfileStore {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProfileRepository for FailingProfileStore {
    fn upsert_profile(&self, _upsert: &ProfileUpsert) -> Result<UserSkillProfile, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(UpstreamError::Store(self.detail.clone()))
    }

    fn fetch_profile(&self, _user_id: &str) -> Result<Option<UserSkillProfile>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(UpstreamError::Store(self.detail.clone()))
    }
}

/// Generator that replays one canned outcome and records every prompt.
pub struct ScriptedTextGenerator {
    outcome: Result<String, UpstreamError>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedTextGenerator {
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(detail: impl Into<String>) -> Self {
        Self {
            outcome: Err(UpstreamError::Model(detail.into())),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().expect("poisoned mutex").len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("poisoned mutex").clone()
    }
}

impl TextGenerator for ScriptedTextGenerator {
    fn generate(&self, request: GenerationRequest<'_>) -> Result<String, UpstreamError> {
        self.prompts
            .lock()
            .expect("poisoned mutex")
            .push(request.prompt.to_string());
        self.outcome.clone()
    }
}

/// A well-formed roadmap document with `days` entries numbered from 1.
pub fn sample_roadmap_json(days: usize) -> String {
    let entries: Vec<_> = (1..=days)
        .map(|day| {
            json!({
                "day": day,
                "focus_topic": format!("Topic {day}"),
                "daily_goal": format!("Finish the day {day} drills"),
                "problems": [
                    {
                        "title": format!("Practice problem {day}"),
                        "difficulty": "Easy",
                        "key_concept": "State definition",
                        "approach_hint": "Start from the smallest subproblem"
                    }
                ],
                "study_resources": ["Editorial notes: recurrence patterns"]
            })
        })
        .collect();

    json!({
        "roadmap": entries,
        "overall_strategy": "Build intuition first, then increase difficulty",
        "success_metrics": "Solve each day's problems without hints"
    })
    .to_string()
}
