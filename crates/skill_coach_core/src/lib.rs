//! Shared domain primitives for the skill profile and roadmap handlers.
//!
//! This crate owns request decoding, validation, level derivation, prompt
//! construction and response envelopes. It intentionally excludes AWS SDK
//! and Lambda runtime concerns, which live in `skill_coach_lambda`.

pub mod envelope;
pub mod error;
pub mod generation;
pub mod model_output;
pub mod profile;
pub mod prompt;
pub mod roadmap;
pub mod validation;
