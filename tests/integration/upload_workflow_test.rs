//! Local upload workflow tests
//!
//! Drives `LocalAssetIntake` through the transport seam end to end:
//! queue → classify → upload → complete → done, plus the failure and
//! cancellation paths.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{picked, UploadFixture};
use intake_app::{IntakeApp, Manifest};
use intake_common::{Error, IntakeConfig};
use intake_transport::mock::MockOutcome;
use intake_transport::{TransferEvent, TransferHandle};
use intake_uploads::{run_upload, UploadPhase, UploadSession, DUPLICATE_FILE_MESSAGE};
use serial_test::serial;

#[test_log::test(tokio::test)]
async fn test_full_upload_workflow() {
    let mut fx = UploadFixture::new();
    fx.transfer.behavior().set_progress_steps(vec![35, 60, 60, 95]);

    fx.queue_classified(&[("site-plan.pdf", "Drawing"), ("survey.jpg", "Photo")]);
    assert!(fx.intake.can_start_upload());
    assert_eq!(fx.intake.title(), "Upload files");

    let phase = run_upload(&mut fx.intake, Arc::new(fx.transfer.clone()))
        .await
        .unwrap();
    assert_eq!(phase, UploadPhase::Complete);
    assert_eq!(fx.intake.title(), "Upload Complete");
    assert_eq!(fx.intake.progress(), 100);

    let recorded = fx.transfer.recorded_requests();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].asset_types, vec!["Drawing", "Photo"]);

    let mut committed: Vec<UploadSession> = Vec::new();
    fx.intake
        .done(&mut |session: UploadSession| committed.push(session))
        .unwrap();

    assert_eq!(committed.len(), 1);
    let names: Vec<&str> = committed[0].queue.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["site-plan.pdf", "survey.jpg"]);
    assert!(fx.intake.is_empty());
    assert_eq!(fx.intake.phase(), UploadPhase::Idle);
    assert_eq!(fx.notices.count(), 0);
}

#[tokio::test]
async fn test_duplicate_batch_is_rejected_then_corrected() {
    let mut fx = UploadFixture::new();
    fx.queue_classified(&[("a.pdf", "Report")]);

    let result = fx
        .intake
        .add_files(vec![picked("b.pdf"), picked("a.pdf")]);
    assert!(matches!(result, Err(Error::DuplicateName { .. })));
    assert_eq!(fx.intake.len(), 1);
    assert_eq!(fx.notices.error_messages(), vec![DUPLICATE_FILE_MESSAGE]);

    // Resubmitting without the colliding name succeeds
    assert_eq!(fx.intake.add_files(vec![picked("b.pdf")]).unwrap(), 1);
    assert!(!fx.intake.can_start_upload());
    fx.intake.set_type(1, "Contract").unwrap();
    assert!(fx.intake.can_start_upload());
}

#[tokio::test]
async fn test_failed_upload_can_be_retried() {
    let mut fx = UploadFixture::new();
    fx.queue_classified(&[("a.pdf", "Report"), ("b.pdf", "Report")]);

    fx.transfer.behavior().set_outcome(MockOutcome::Fail);
    fx.transfer.behavior().set_error_message("gateway timeout");
    let phase = run_upload(&mut fx.intake, Arc::new(fx.transfer.clone()))
        .await
        .unwrap();

    assert_eq!(phase, UploadPhase::Idle);
    assert_eq!(fx.intake.len(), 2);
    assert!(fx.intake.last_error().unwrap().contains("gateway timeout"));
    assert_eq!(fx.notices.warning_messages().len(), 1);

    // Queue is editable again after a failure
    fx.intake.remove(1).unwrap();

    fx.transfer.behavior().reset();
    fx.transfer.behavior().set_delay_ms(0);
    let phase = run_upload(&mut fx.intake, Arc::new(fx.transfer.clone()))
        .await
        .unwrap();
    assert_eq!(phase, UploadPhase::Complete);
    assert!(fx.intake.last_error().is_none());
    assert_eq!(fx.transfer.recorded_requests().len(), 2);
    assert_eq!(fx.transfer.recorded_requests()[1].names, vec!["a.pdf"]);
}

#[tokio::test]
async fn test_cancel_during_upload_discards_session() {
    let mut fx = UploadFixture::new();
    fx.transfer.behavior().set_outcome(MockOutcome::Timeout);
    fx.queue_classified(&[("a.pdf", "Report")]);

    let request = fx.intake.start_upload().unwrap();
    let mut handle = TransferHandle::spawn(Arc::new(fx.transfer.clone()), request);

    // The user closes the dialog mid-transfer
    fx.intake.cancel();
    handle.cancel();

    assert!(fx.intake.is_empty());
    assert_eq!(fx.intake.phase(), UploadPhase::Idle);

    let next = tokio::time::timeout(Duration::from_secs(1), handle.next_event())
        .await
        .expect("cancelled transfer should close its stream");
    assert!(next.is_none());

    // Late events from a discarded transfer have nothing to act on
    assert_eq!(fx.intake.report_progress(80), 0);
    assert!(fx.intake.finish_upload().is_err());
}

#[tokio::test]
async fn test_progress_never_decreases_across_events() {
    let mut fx = UploadFixture::new();
    fx.transfer
        .behavior()
        .set_progress_steps(vec![50, 20, 110, 70]);
    fx.queue_classified(&[("a.pdf", "Report")]);

    let request = fx.intake.start_upload().unwrap();
    let mut handle = TransferHandle::spawn(Arc::new(fx.transfer.clone()), request);

    let mut seen = vec![fx.intake.progress()];
    while let Some(event) = handle.next_event().await {
        match event {
            TransferEvent::Progress(p) => seen.push(fx.intake.report_progress(p)),
            TransferEvent::Finished(_) => {
                fx.intake.finish_upload().unwrap();
                seen.push(fx.intake.progress());
                break;
            }
            TransferEvent::Failed(reason) => panic!("unexpected failure: {}", reason),
        }
    }

    assert_eq!(seen, vec![10, 50, 50, 100, 100, 100]);
}

#[tokio::test]
#[serial]
async fn test_app_runs_manifest_with_env_configuration() {
    std::env::set_var("INTAKE_TRANSFER_PROVIDER", "mock");
    std::env::set_var("INTAKE_NOTIFY_PROVIDER", "mock");
    let config = IntakeConfig::from_env();
    std::env::remove_var("INTAKE_TRANSFER_PROVIDER");
    std::env::remove_var("INTAKE_NOTIFY_PROVIDER");
    let config = config.unwrap();

    let manifest: Manifest = serde_json::from_value(serde_json::json!({
        "asset_types": [{"name": "Report"}, {"name": "Photo"}],
        "files": [
            {"name": "a.pdf", "handle": "h-1", "type": "Report"},
            {"name": "b.jpg", "handle": "h-2", "type": "Photo"}
        ],
        "links": [{"url": "https://example.com/brief", "type": "Report"}]
    }))
    .unwrap();

    let app = IntakeApp::create(config, manifest.asset_types.clone()).unwrap();
    let report = app.run_manifest(manifest).await.unwrap();

    let uploaded = report.uploaded.expect("upload should complete");
    assert_eq!(uploaded.phase, UploadPhase::Complete);
    assert_eq!(uploaded.queue.len(), 2);
    assert_eq!(report.linked.len(), 1);
}
