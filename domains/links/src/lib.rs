//! Links domain: external-link intake queue with per-row URL and type validation

pub mod domain;
pub mod session;

pub use domain::entities::{LinkIssue, LinkedAsset, PendingLinkAsset};
pub use session::{LinkAssetIntake, LinkCommitHandler, LINK_TITLE};
