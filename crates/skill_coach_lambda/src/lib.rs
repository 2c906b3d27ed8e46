//! AWS-oriented adapters and handlers for the skill profile and roadmap
//! Lambdas.
//!
//! This crate owns runtime integration details (Lambda entrypoints, the
//! DynamoDB and Bedrock adapters, environment configuration and logging).
//! Request contracts and validation live in `skill_coach_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod logging;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
