// Management of saved drafts: list, copy, delete, export, clear.
//
// Responsibilities
// - Read only prefixed keys, capped to the last MAX_VERSIONS versions.
// - Re-render the list after every mutation so the view matches the store.
// - Destructive actions ask for confirmation first.
// - Store failures are logged and degrade to an empty or unchanged result.

use crate::modules::drafts::core::history::DraftHistory;
use crate::modules::drafts::core::ports::{Clipboard, Confirm};
use crate::modules::drafts::core::storage_key::{branch_from_key, storage_key};
use crate::modules::drafts::core::version::Version;
use crate::modules::drafts::use_cases::manage_drafts::copy_button::CopyButton;
use crate::modules::drafts::use_cases::manage_drafts::export::{ExportFile, build_export};
use crate::modules::drafts::use_cases::manage_drafts::view::{
    BranchDrafts, CLEARED_MESSAGE, DraftListView, render,
};
use crate::shared::core::primitives::Clock;
use crate::shared::infrastructure::key_value_store::KeyValueStore;
use chrono::Local;
use std::sync::Arc;
use tracing::{info, warn};

pub struct ManageDraftsHandler {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl ManageDraftsHandler {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn list_drafts(&self) -> DraftListView {
        render(self.load_branches().await, self.clock.now_millis())
    }

    pub async fn delete_branch(&self, branch: &str, confirm: &dyn Confirm) -> Option<DraftListView> {
        if !confirm.confirm(&format!("Delete all versions for branch \"{branch}\"?")) {
            return None;
        }
        match self.store.remove(&storage_key(branch)).await {
            Ok(()) => info!(branch = %branch, "deleted draft branch"),
            Err(err) => warn!(branch = %branch, error = %err, "failed to delete draft branch"),
        }
        Some(self.list_drafts().await)
    }

    /// Removes the version at slot `index` of the branch's listed (last 10) versions.
    pub async fn delete_version(&self, branch: &str, index: usize) -> DraftListView {
        let key = storage_key(branch);
        let mut history = self.load_history(&key).await;
        if history.remove_at(index).is_none() {
            return self.list_drafts().await;
        }
        let history = history.capped();

        let result = if history.is_empty() {
            self.store.remove(&key).await
        } else {
            self.store.set(&key, history.to_stored()).await
        };
        match result {
            Ok(()) => info!(branch = %branch, index, remaining = history.len(), "deleted draft version"),
            Err(err) => warn!(branch = %branch, error = %err, "failed to delete draft version"),
        }
        self.list_drafts().await
    }

    pub async fn find_version(&self, branch: &str, index: usize) -> Option<Version> {
        let history = self.load_history(&storage_key(branch)).await;
        history.versions().get(index).cloned()
    }

    /// Copies the version's text. `None` when no such version exists.
    pub async fn copy_version(
        &self,
        branch: &str,
        index: usize,
        clipboard: &dyn Clipboard,
        button: &CopyButton,
    ) -> Option<bool> {
        let version = self.find_version(branch, index).await?;
        Some(button.copy(clipboard, &version.text).await)
    }

    pub async fn export_all(&self) -> ExportFile {
        build_export(&self.load_branches().await, &Local)
    }

    /// Wipes the whole store, including keys that are not drafts.
    pub async fn clear_all(&self, confirm: &dyn Confirm) -> Option<DraftListView> {
        if !confirm.confirm("Are you sure you want to clear all saved drafts?") {
            return None;
        }
        match self.store.clear().await {
            Ok(()) => info!("cleared all drafts"),
            Err(err) => warn!(error = %err, "failed to clear drafts"),
        }
        Some(DraftListView::Cleared {
            message: CLEARED_MESSAGE.to_string(),
        })
    }

    async fn load_history(&self, key: &str) -> DraftHistory {
        match self.store.get(key).await {
            Ok(Some(value)) => DraftHistory::from_stored(value).capped(),
            Ok(None) => DraftHistory::new(),
            Err(err) => {
                warn!(key = %key, error = %err, "failed to load draft history");
                DraftHistory::new()
            }
        }
    }

    async fn load_branches(&self) -> Vec<BranchDrafts> {
        let entries = match self.store.get_all().await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "failed to load drafts");
                return Vec::new();
            }
        };
        entries
            .into_iter()
            .filter_map(|(key, value)| {
                let branch = branch_from_key(&key)?.to_string();
                Some(BranchDrafts {
                    branch,
                    history: DraftHistory::from_stored(value).capped(),
                })
            })
            .collect()
    }
}
