//! Shared domain types for Persona.
//!
//! This crate contains the core domain types used across the Persona
//! platform: the `Personality` aggregate, its value objects (`Alias`,
//! `PersonalityProfile`, `ModelConfig`, `UserId`), platform configuration,
//! and the associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod alias;
pub mod config;
pub mod error;
pub mod model;
pub mod personality;
pub mod profile;
pub mod value;
