//! Process-level configuration, read from the environment once at cold start
//! and passed into the handlers.

use skill_coach_core::generation::GenerationSettings;
use thiserror::Error;

pub const DEFAULT_TABLE_NAME: &str = "UserSkillProfiles";
pub const DEFAULT_BEDROCK_REGION: &str = "us-east-1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    InvalidValue {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileStoreConfig {
    pub table_name: String,
}

impl ProfileStoreConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            table_name: non_blank(lookup("TABLE_NAME"))
                .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoadmapConfig {
    pub region: String,
    pub generation: GenerationSettings,
}

impl RoadmapConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut generation = GenerationSettings::default();

        if let Some(model_id) = non_blank(lookup("MODEL_ID")) {
            generation.model_id = model_id;
        }

        if let Some(raw) = non_blank(lookup("MODEL_TEMPERATURE")) {
            generation.temperature = raw
                .parse::<f32>()
                .ok()
                .filter(|value| (0.0..=1.0).contains(value))
                .ok_or(ConfigError::InvalidValue {
                    name: "MODEL_TEMPERATURE",
                    expected: "a number between 0 and 1",
                    value: raw,
                })?;
        }

        if let Some(raw) = non_blank(lookup("MODEL_MAX_TOKENS")) {
            generation.max_tokens = raw
                .parse::<u32>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: "MODEL_MAX_TOKENS",
                    expected: "a positive integer",
                    value: raw,
                })?;
        }

        Ok(Self {
            region: non_blank(lookup("BEDROCK_REGION"))
                .unwrap_or_else(|| DEFAULT_BEDROCK_REGION.to_string()),
            generation,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
