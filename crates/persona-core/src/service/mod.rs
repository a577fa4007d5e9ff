//! Application services orchestrating domain operations.

pub mod personality;
