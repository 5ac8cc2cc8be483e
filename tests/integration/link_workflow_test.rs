//! External link workflow tests

mod common;

use common::link_intake;
use intake_common::{Error, LinkValidator};
use intake_links::{LinkAssetIntake, LinkIssue, LinkedAsset};

fn fill(intake: &mut LinkAssetIntake, rows: &[(Option<&str>, Option<&str>)]) {
    for (url, asset_type) in rows {
        let index = intake.add_link();
        if let Some(url) = url {
            intake.set_url(index, *url).unwrap();
        }
        if let Some(asset_type) = asset_type {
            intake.set_type(index, asset_type).unwrap();
        }
    }
}

#[test_log::test]
fn test_link_workflow_commits_valid_batch() {
    let mut intake = link_intake();
    assert!(intake.is_empty());
    assert!(!intake.can_commit());

    fill(
        &mut intake,
        &[
            (Some("https://x.com/doc"), Some("Report")),
            (Some("drawings/elevation.PDF"), Some("Drawing")),
        ],
    );
    assert!(intake.can_commit());

    let mut batches: Vec<Vec<LinkedAsset>> = Vec::new();
    let count = intake
        .commit(&mut |links: Vec<LinkedAsset>| batches.push(links))
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0][1].url, "drawings/elevation.PDF");
    assert_eq!(batches[0][1].asset_type, "Drawing");
    assert!(intake.is_empty());
}

#[test]
fn test_rows_are_fixed_until_commit_is_allowed() {
    let mut intake = link_intake();
    fill(
        &mut intake,
        &[
            (Some("https://x.com/doc"), Some("Report")),
            (Some("setup.exe"), Some("Report")),
            (None, Some("Photo")),
        ],
    );

    assert!(!intake.can_commit());
    assert_eq!(
        intake.entry_issues(1).unwrap(),
        vec![LinkIssue::DisallowedExtension]
    );
    assert_eq!(intake.entry_issues(2).unwrap(), vec![LinkIssue::MissingUrl]);

    let mut calls = 0;
    let result = intake.commit(&mut |_links: Vec<LinkedAsset>| calls += 1);
    assert!(matches!(result, Err(Error::Validation(_))));
    assert_eq!(calls, 0);
    assert_eq!(intake.len(), 3);

    intake.set_url(1, "setup.docx").unwrap();
    intake.set_url(2, "http://photos.example.com/site").unwrap();
    assert!(intake.can_commit());
    assert_eq!(
        intake
            .commit(&mut |_links: Vec<LinkedAsset>| calls += 1)
            .unwrap(),
        3
    );
    assert_eq!(calls, 1);
}

#[test]
fn test_configured_allow_list_applies_to_non_http_links() {
    let mut intake = LinkAssetIntake::new(common::catalog(), LinkValidator::new(["dwg"]));
    fill(
        &mut intake,
        &[
            (Some("plans/level-1.dwg"), Some("Drawing")),
            (Some("https://x.com/anything.exe"), Some("Drawing")),
        ],
    );
    assert!(intake.can_commit());

    intake.add_link();
    intake.set_url(2, "report.pdf").unwrap();
    intake.set_type(2, "Report").unwrap();
    assert!(!intake.can_commit());
}

#[test]
fn test_close_discards_without_commit() {
    let mut intake = link_intake();
    fill(&mut intake, &[(Some("file.pdf"), Some("Report"))]);

    intake.close();
    assert!(intake.is_empty());
    assert!(!intake.can_commit());
}
