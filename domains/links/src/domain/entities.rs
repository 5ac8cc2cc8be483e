//! Domain entities for external links

use intake_common::{is_parseable_reference, LinkValidator};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reason a link row blocks the commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkIssue {
    MissingUrl,
    MissingType,
    MalformedUrl,
    DisallowedExtension,
}

impl LinkIssue {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingUrl => "MISSING_URL",
            Self::MissingType => "MISSING_TYPE",
            Self::MalformedUrl => "MALFORMED_URL",
            Self::DisallowedExtension => "DISALLOWED_EXTENSION",
        }
    }
}

impl std::fmt::Display for LinkIssue {
    #[mutants::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingUrl => write!(f, "A file URL is required"),
            Self::MissingType => write!(f, "A file type is required"),
            Self::MalformedUrl => write!(f, "The URL is not valid"),
            Self::DisallowedExtension => write!(f, "The file extension is not allowed"),
        }
    }
}

/// A link row being edited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLinkAsset {
    pub id: Uuid,
    /// Raw user input, never normalized
    pub url: Option<String>,
    pub asset_type: Option<String>,
}

impl Default for PendingLinkAsset {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            url: None,
            asset_type: None,
        }
    }
}

impl PendingLinkAsset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every reason this row cannot be committed, in display order
    pub fn issues(&self, validator: &LinkValidator) -> Vec<LinkIssue> {
        let mut issues = Vec::new();

        match self.url.as_deref().filter(|url| !url.is_empty()) {
            None => issues.push(LinkIssue::MissingUrl),
            Some(url) => {
                if !is_parseable_reference(url) {
                    issues.push(LinkIssue::MalformedUrl);
                }
                if !validator.has_allowed_extension(url) {
                    issues.push(LinkIssue::DisallowedExtension);
                }
            }
        }

        if self.asset_type.is_none() {
            issues.push(LinkIssue::MissingType);
        }

        issues
    }

    pub fn is_valid(&self, validator: &LinkValidator) -> bool {
        self.issues(validator).is_empty()
    }
}

/// A committed link handed to the commit handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedAsset {
    pub url: String,
    #[serde(rename = "type")]
    pub asset_type: String,
}
