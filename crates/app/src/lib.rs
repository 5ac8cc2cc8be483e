//! Asset intake composition root
//!
//! Wires configuration, the asset-type catalog, the notification sink and the
//! transfer service into both intake flows, and runs a JSON manifest through
//! them headlessly.

use std::sync::Arc;

use intake_common::{AssetTypeCatalog, IntakeConfig};
use intake_links::{LinkAssetIntake, LinkIssue, LinkedAsset};
use intake_notify::{NotificationSink, NotificationSinkFactory, NotifyConfig};
use intake_transport::{TransferConfig, TransferService, TransferServiceFactory};
use intake_uploads::{
    run_upload, FileCandidate, FileHandle, LocalAssetIntake, UploadPhase, UploadSession,
};
use serde::{Deserialize, Serialize};

/// One picked file in a manifest
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestFile {
    pub name: String,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default, rename = "type")]
    pub asset_type: Option<String>,
}

/// One link row in a manifest
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestLink {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "type")]
    pub asset_type: Option<String>,
}

/// Input for a headless run of both intake flows
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub asset_types: AssetTypeCatalog,
    #[serde(default)]
    pub files: Vec<ManifestFile>,
    #[serde(default)]
    pub links: Vec<ManifestLink>,
}

/// Issues found on a single link row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowIssues {
    pub index: usize,
    pub issues: Vec<LinkIssue>,
}

/// Outcome of a manifest run
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntakeReport {
    pub uploaded: Option<UploadSession>,
    pub upload_error: Option<String>,
    pub linked: Vec<LinkedAsset>,
    pub link_errors: Vec<RowIssues>,
    pub link_error: Option<String>,
}

pub struct IntakeApp {
    config: IntakeConfig,
    catalog: Arc<AssetTypeCatalog>,
    notifier: Arc<dyn NotificationSink>,
    transfer: Arc<dyn TransferService>,
}

impl IntakeApp {
    /// Build the app from configuration, creating providers through their factories
    pub fn create(config: IntakeConfig, catalog: AssetTypeCatalog) -> anyhow::Result<Self> {
        let notifier = NotificationSinkFactory::create(&NotifyConfig::from(&config))?;
        let transfer = TransferServiceFactory::create(&TransferConfig::from(&config))?;

        Ok(Self::with_services(config, catalog, notifier, transfer))
    }

    pub fn with_services(
        config: IntakeConfig,
        catalog: AssetTypeCatalog,
        notifier: Arc<dyn NotificationSink>,
        transfer: Arc<dyn TransferService>,
    ) -> Self {
        Self {
            config,
            catalog: Arc::new(catalog),
            notifier,
            transfer,
        }
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    pub fn catalog(&self) -> &AssetTypeCatalog {
        &self.catalog
    }

    pub fn local_intake(&self) -> LocalAssetIntake {
        LocalAssetIntake::new(self.catalog.clone(), self.notifier.clone())
            .with_settings(self.config.progress)
    }

    pub fn link_intake(&self) -> LinkAssetIntake {
        LinkAssetIntake::new(self.catalog.clone(), self.config.link_validator())
    }

    /// Run every file and link in the manifest through a fresh session each.
    ///
    /// Rejected input is reported, not returned as an error.
    pub async fn run_manifest(&self, manifest: Manifest) -> anyhow::Result<IntakeReport> {
        let mut report = IntakeReport::default();

        if !manifest.files.is_empty() {
            match self.upload_files(manifest.files).await {
                Ok(session) => report.uploaded = session,
                Err(e) => {
                    tracing::warn!(error = %e, code = e.error_code(), "File intake rejected");
                    report.upload_error = Some(e.to_string());
                }
            }
        }

        if !manifest.links.is_empty() {
            match self.link_external(manifest.links) {
                Ok((linked, link_errors)) => {
                    report.linked = linked;
                    report.link_errors = link_errors;
                }
                Err(e) => {
                    tracing::warn!(error = %e, code = e.error_code(), "Link intake rejected");
                    report.link_error = Some(e.to_string());
                }
            }
        }

        Ok(report)
    }

    async fn upload_files(
        &self,
        files: Vec<ManifestFile>,
    ) -> intake_common::Result<Option<UploadSession>> {
        let mut intake = self.local_intake();

        let types: Vec<Option<String>> = files.iter().map(|f| f.asset_type.clone()).collect();
        intake.add_files(
            files
                .into_iter()
                .map(|f| FileCandidate {
                    name: f.name,
                    handle: f.handle.map(FileHandle::new),
                })
                .collect(),
        )?;
        for (index, asset_type) in types.iter().enumerate() {
            if let Some(asset_type) = asset_type {
                intake.set_type(index, asset_type)?;
            }
        }

        if run_upload(&mut intake, self.transfer.clone()).await? != UploadPhase::Complete {
            return Err(intake_common::Error::Internal(
                intake
                    .last_error()
                    .unwrap_or("Upload did not complete")
                    .to_string(),
            ));
        }

        let mut committed = None;
        intake.done(&mut |session: UploadSession| committed = Some(session))?;
        Ok(committed)
    }

    fn link_external(
        &self,
        links: Vec<ManifestLink>,
    ) -> intake_common::Result<(Vec<LinkedAsset>, Vec<RowIssues>)> {
        let mut intake = self.link_intake();

        for link in links {
            let index = intake.add_link();
            if let Some(url) = link.url {
                intake.set_url(index, url)?;
            }
            if let Some(asset_type) = link.asset_type {
                intake.set_type(index, &asset_type)?;
            }
        }

        if !intake.can_commit() {
            let mut errors = Vec::new();
            for index in 0..intake.len() {
                let issues = intake.entry_issues(index)?;
                if !issues.is_empty() {
                    errors.push(RowIssues { index, issues });
                }
            }
            intake.close();
            return Ok((Vec::new(), errors));
        }

        let mut linked = Vec::new();
        intake.commit(&mut |links: Vec<LinkedAsset>| linked = links)?;
        Ok((linked, Vec::new()))
    }
}
