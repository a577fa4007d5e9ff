//! Business logic and repository trait definitions for Persona.
//!
//! This crate defines the "ports" (repository traits) that the
//! infrastructure layer implements, the in-memory personality registry,
//! and the application service that keeps registry and storage in lockstep.
//! It depends only on `persona-types` -- never on `persona-infra` or any
//! database/IO crate.

pub mod registry;
pub mod repository;
pub mod service;
