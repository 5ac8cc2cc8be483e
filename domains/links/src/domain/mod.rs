//! Links domain layer

pub mod entities;
