// Shared test fixtures for saved draft histories.
// Compiled into the crate only during tests (cfg(test) in src/lib.rs).

use crate::modules::drafts::core::history::DraftHistory;
use crate::modules::drafts::core::version::Version;
use crate::modules::drafts::use_cases::manage_drafts::view::BranchDrafts;
use serde_json::Value;

/// History holding exactly the given `(text, timestamp)` pairs, oldest first, without dedup.
pub fn history_of(versions: &[(&str, i64)]) -> DraftHistory {
    DraftHistory::from_versions(
        versions
            .iter()
            .map(|(text, timestamp)| Version::new(*text, *timestamp))
            .collect(),
    )
}

/// The stored JSON array for the given versions.
pub fn stored_history(versions: &[(&str, i64)]) -> Value {
    history_of(versions).to_stored()
}

pub fn branch_drafts(branch: &str, versions: &[(&str, i64)]) -> BranchDrafts {
    BranchDrafts {
        branch: branch.to_string(),
        history: history_of(versions),
    }
}
