//! URL and extension validation shared by both intake flows
//!
//! All functions here are pure. A well-formed absolute http(s) URL is never
//! extension-checked; any other string is judged by the text after its last `.`.

use std::sync::LazyLock;

use url::Url;

/// Extensions accepted for links that are not absolute http(s) URLs
pub const DEFAULT_LINK_EXTENSIONS: &[&str] =
    &["jpg", "png", "ppt", "pptx", "pdf", "xml", "doc", "docx"];

/// Base used to resolve relative references such as `file.pdf`
static REFERENCE_BASE: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://intake.invalid/").expect("reference base URL is valid")
});

/// True only for absolute URLs whose scheme is exactly `http` or `https`
pub fn is_well_formed_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// True if the value parses either as an absolute URL or as a relative
/// reference. Blank input never parses.
pub fn is_parseable_reference(value: &str) -> bool {
    if value.trim().is_empty() {
        return false;
    }
    Url::options()
        .base_url(Some(&REFERENCE_BASE))
        .parse(value)
        .is_ok()
}

/// Text after the last `.`, or the whole value when there is no `.`
pub fn extension_of(value: &str) -> &str {
    match value.rfind('.') {
        Some(pos) => &value[pos + 1..],
        None => value,
    }
}

/// Extension check against the default allow-list
pub fn has_allowed_extension(value: &str) -> bool {
    LinkValidator::default().has_allowed_extension(value)
}

/// Link validator carrying a configurable extension allow-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkValidator {
    allowed_extensions: Vec<String>,
}

impl Default for LinkValidator {
    fn default() -> Self {
        Self::new(DEFAULT_LINK_EXTENSIONS.iter().copied())
    }
}

impl LinkValidator {
    /// Create a validator; extensions are matched case-insensitively
    pub fn new<I, S>(allowed_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_extensions = allowed_extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { allowed_extensions }
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn is_well_formed_url(&self, value: &str) -> bool {
        is_well_formed_url(value)
    }

    /// Well-formed http(s) URLs pass unconditionally; anything else must end
    /// in an allowed extension.
    pub fn has_allowed_extension(&self, value: &str) -> bool {
        if is_well_formed_url(value) {
            return true;
        }
        let extension = extension_of(value).to_lowercase();
        self.allowed_extensions.iter().any(|ext| *ext == extension)
    }
}
