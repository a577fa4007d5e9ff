//! SQLite persistence for Persona.

pub mod personality;
pub mod pool;
