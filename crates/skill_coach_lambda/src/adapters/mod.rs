pub mod profile_store;
pub mod text_generation;
