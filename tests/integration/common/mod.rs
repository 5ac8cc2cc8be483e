//! Common test utilities and fixtures for integration tests
//!
//! Shared catalog, notification and transport fixtures for both intake flows.

use std::sync::Arc;

use intake_common::{AssetTypeCatalog, LinkValidator};
use intake_links::LinkAssetIntake;
use intake_notify::mock::MockNotificationSink;
use intake_transport::mock::MockTransferService;
use intake_uploads::{FileCandidate, FileHandle, LocalAssetIntake};

/// Catalog used across integration tests
pub fn catalog() -> Arc<AssetTypeCatalog> {
    Arc::new(
        AssetTypeCatalog::from_names(["Report", "Drawing", "Photo", "Contract"])
            .expect("fixture catalog is valid"),
    )
}

/// A picked file with a handle derived from its name
#[allow(dead_code)]
pub fn picked(name: &str) -> FileCandidate {
    FileCandidate::new(name, FileHandle::new(format!("picker:{}", name)))
}

/// Local intake wired to a capturing notification sink
#[allow(dead_code)]
pub struct UploadFixture {
    pub intake: LocalAssetIntake,
    pub notices: Arc<MockNotificationSink>,
    pub transfer: MockTransferService,
}

#[allow(dead_code)]
impl UploadFixture {
    pub fn new() -> Self {
        let notices = Arc::new(MockNotificationSink::new());
        let transfer = MockTransferService::new();
        transfer.behavior().set_delay_ms(0);
        Self {
            intake: LocalAssetIntake::new(catalog(), notices.clone()),
            notices,
            transfer,
        }
    }

    /// Queue files and classify each with the given type
    pub fn queue_classified(&mut self, files: &[(&str, &str)]) {
        let start = self.intake.len();
        self.intake
            .add_files(files.iter().map(|(name, _)| picked(name)).collect())
            .expect("fixture files are unique");
        for (offset, (_, asset_type)) in files.iter().enumerate() {
            self.intake
                .set_type(start + offset, asset_type)
                .expect("fixture type is in the catalog");
        }
    }
}

#[allow(dead_code)]
pub fn link_intake() -> LinkAssetIntake {
    LinkAssetIntake::new(catalog(), LinkValidator::default())
}
