//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables. Every value has a
//! default matching the stock upload dialog, so an empty environment
//! yields a working configuration.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use validator::Validate;

use crate::validation::{LinkValidator, DEFAULT_LINK_EXTENSIONS};

/// Progress settings for a local upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProgressSettings {
    /// Percent shown as soon as an upload starts
    #[validate(range(max = 100))]
    pub initial_percent: u8,

    /// Percent added on every tick
    #[validate(range(min = 1, max = 100))]
    pub step_percent: u8,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            initial_percent: 10,
            step_percent: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IntakeConfig {
    #[validate(nested)]
    pub progress: ProgressSettings,

    /// Interval between simulated progress ticks
    #[validate(range(min = 1))]
    pub progress_tick_ms: u64,

    /// Total duration of a simulated transfer
    #[validate(range(min = 1))]
    pub simulated_upload_ms: u64,

    /// Extensions accepted for non-http(s) links
    #[validate(length(min = 1))]
    pub link_extensions: Vec<String>,

    /// Transfer provider (simulated, mock)
    pub transfer_provider: String,

    /// Notification provider (log, mock)
    pub notify_provider: String,

    /// Deliver notices at all
    pub notify_enabled: bool,

    /// Runtime configuration
    pub rust_log: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            progress: ProgressSettings::default(),
            progress_tick_ms: 250,
            simulated_upload_ms: 3000,
            link_extensions: DEFAULT_LINK_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            transfer_provider: "simulated".to_string(),
            notify_provider: "log".to_string(),
            notify_enabled: true,
            rust_log: "intake=info".to_string(),
        }
    }
}

impl IntakeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let defaults = Self::default();

        let config = Self {
            progress: ProgressSettings {
                initial_percent: parse_var(
                    "INTAKE_PROGRESS_INITIAL",
                    defaults.progress.initial_percent,
                )?,
                step_percent: parse_var("INTAKE_PROGRESS_STEP", defaults.progress.step_percent)?,
            },
            progress_tick_ms: parse_var("INTAKE_PROGRESS_TICK_MS", defaults.progress_tick_ms)?,
            simulated_upload_ms: parse_var(
                "INTAKE_SIMULATED_UPLOAD_MS",
                defaults.simulated_upload_ms,
            )?,
            link_extensions: env::var("INTAKE_LINK_EXTENSIONS")
                .map(|raw| {
                    raw.split(',')
                        .map(|ext| ext.trim().to_string())
                        .filter(|ext| !ext.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.link_extensions),
            transfer_provider: env::var("INTAKE_TRANSFER_PROVIDER")
                .unwrap_or(defaults.transfer_provider),
            notify_provider: env::var("INTAKE_NOTIFY_PROVIDER")
                .unwrap_or(defaults.notify_provider),
            notify_enabled: parse_var("INTAKE_NOTIFY_ENABLED", defaults.notify_enabled)?,
            rust_log: env::var("RUST_LOG").unwrap_or(defaults.rust_log),
        };

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid intake configuration: {}", e))?;

        tracing::debug!(
            transfer_provider = %config.transfer_provider,
            notify_provider = %config.notify_provider,
            "Intake configuration loaded"
        );

        Ok(config)
    }

    /// Link validator built from the configured allow-list
    pub fn link_validator(&self) -> LinkValidator {
        LinkValidator::new(&self.link_extensions)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} is not valid: {}", name, e)),
        Err(_) => Ok(default),
    }
}
