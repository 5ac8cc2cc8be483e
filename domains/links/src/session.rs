//! External-link intake session
//!
//! Rows are edited in place and committed as one batch. There is no upload
//! phase: a valid batch is handed to the commit handler immediately.

use std::sync::Arc;

use intake_common::{AssetTypeCatalog, Error, LinkValidator, Result, StateError};
use uuid::Uuid;

use crate::domain::entities::{LinkIssue, LinkedAsset, PendingLinkAsset};

/// Caller-facing title of the link flow
pub const LINK_TITLE: &str = "Link external files";

/// Receives every committed batch of links
pub trait LinkCommitHandler {
    fn on_link_commit(&mut self, links: Vec<LinkedAsset>);
}

impl<F> LinkCommitHandler for F
where
    F: FnMut(Vec<LinkedAsset>),
{
    fn on_link_commit(&mut self, links: Vec<LinkedAsset>) {
        self(links)
    }
}

#[derive(Debug)]
pub struct LinkAssetIntake {
    id: Uuid,
    catalog: Arc<AssetTypeCatalog>,
    validator: LinkValidator,
    queue: Vec<PendingLinkAsset>,
}

impl LinkAssetIntake {
    pub fn new(catalog: Arc<AssetTypeCatalog>, validator: LinkValidator) -> Self {
        Self {
            id: Uuid::new_v4(),
            catalog,
            validator,
            queue: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &'static str {
        LINK_TITLE
    }

    pub fn queue(&self) -> &[PendingLinkAsset] {
        &self.queue
    }

    pub fn validator(&self) -> &LinkValidator {
        &self.validator
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Append an empty row and return its index
    pub fn add_link(&mut self) -> usize {
        self.queue.push(PendingLinkAsset::new());
        let index = self.queue.len() - 1;
        tracing::debug!(session_id = %self.id, index, "Link row added");
        index
    }

    /// Store the raw URL text for a row
    pub fn set_url(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        Error::check_index(index, self.queue.len())?;
        let value = value.into();
        tracing::debug!(session_id = %self.id, index, url = %value, "Link URL set");
        self.queue[index].url = Some(value);
        Ok(())
    }

    pub fn set_type(&mut self, index: usize, asset_type: &str) -> Result<()> {
        Error::check_index(index, self.queue.len())?;
        let resolved = self.catalog.resolve(asset_type)?.name.clone();
        tracing::debug!(session_id = %self.id, index, asset_type = %resolved, "Link classified");
        self.queue[index].asset_type = Some(resolved);
        Ok(())
    }

    /// Per-row indicators for the row at `index`
    pub fn entry_issues(&self, index: usize) -> Result<Vec<LinkIssue>> {
        Error::check_index(index, self.queue.len())?;
        Ok(self.queue[index].issues(&self.validator))
    }

    pub fn is_entry_valid(&self, index: usize) -> Result<bool> {
        Ok(self.entry_issues(index)?.is_empty())
    }

    /// Recomputed from the current rows on every call
    pub fn can_commit(&self) -> bool {
        !self.queue.is_empty() && self.queue.iter().all(|row| row.is_valid(&self.validator))
    }

    /// Hand every row to `handler` and clear the session.
    ///
    /// Rejected without mutation when the session is empty or any row is invalid.
    pub fn commit<H>(&mut self, handler: &mut H) -> Result<usize>
    where
        H: LinkCommitHandler + ?Sized,
    {
        if self.queue.is_empty() {
            return Err(StateError::GuardFailed("There are no links to commit".to_string()).into());
        }

        if let Some((index, issues)) = self
            .queue
            .iter()
            .map(|row| row.issues(&self.validator))
            .enumerate()
            .find(|(_, issues)| !issues.is_empty())
        {
            tracing::warn!(
                session_id = %self.id,
                index,
                issues = ?issues,
                "Link commit blocked by an invalid row"
            );
            let reasons: Vec<String> = issues.iter().map(|issue| issue.to_string()).collect();
            return Err(Error::Validation(format!(
                "Link {} is invalid: {}",
                index + 1,
                reasons.join(", ")
            )));
        }

        let links: Vec<LinkedAsset> = self
            .queue
            .iter()
            .filter_map(|row| match (&row.url, &row.asset_type) {
                (Some(url), Some(asset_type)) => Some(LinkedAsset {
                    url: url.clone(),
                    asset_type: asset_type.clone(),
                }),
                _ => None,
            })
            .collect();
        let committed = links.len();

        tracing::info!(session_id = %self.id, committed, "Links committed");
        handler.on_link_commit(links);
        self.reset();
        Ok(committed)
    }

    /// Discard every row without committing
    pub fn close(&mut self) {
        tracing::info!(session_id = %self.id, queue_len = self.queue.len(), "Link session discarded");
        self.reset();
    }

    fn reset(&mut self) {
        self.id = Uuid::new_v4();
        self.queue.clear();
    }
}
