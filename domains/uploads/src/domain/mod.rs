//! Uploads domain layer: entities, state machines

pub mod entities;
pub mod state;
