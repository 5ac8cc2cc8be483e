//! Shared utilities, configuration, and error handling for asset intake
//!
//! This crate provides common functionality used by both intake flows:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - The externally supplied asset-type catalog
//! - URL and extension validators

pub mod catalog;
pub mod config;
pub mod error;
pub mod state;
pub mod validation;

pub use catalog::{AssetType, AssetTypeCatalog};
pub use config::{IntakeConfig, ProgressSettings};
pub use error::{Error, Result};
pub use state::StateError;
pub use validation::{
    extension_of, has_allowed_extension, is_parseable_reference, is_well_formed_url,
    LinkValidator, DEFAULT_LINK_EXTENSIONS,
};
