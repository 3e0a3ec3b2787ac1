// View model for the saved drafts list.
//
// Responsibilities
// - Order branches by their latest save, newest first; branches without versions go last.
// - Show versions newest first, numbered n..1, each remembering its slot in the stored list.
// - Label each version with a coarse relative age.

use crate::modules::drafts::core::history::DraftHistory;
use crate::shared::core::primitives::EpochMillis;
use serde::Serialize;

pub const NO_DRAFTS_MESSAGE: &str = "No saved drafts found.";
pub const CLEARED_MESSAGE: &str = "All drafts cleared.";
pub const VERSION_LIMIT_INFO: &str = "Showing last 10 versions";

/// One branch's versions as read from the store, already capped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchDrafts {
    pub branch: String,
    pub history: DraftHistory,
}

impl BranchDrafts {
    fn latest_timestamp(&self) -> EpochMillis {
        self.history.latest().map_or(0, |v| v.timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DraftListView {
    Empty { message: String },
    Cleared { message: String },
    Branches { branches: Vec<BranchSection> },
}

impl DraftListView {
    pub fn branches(&self) -> &[BranchSection] {
        match self {
            DraftListView::Branches { branches } => branches,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchSection {
    pub branch: String,
    pub header: String,
    pub info: String,
    pub expanded: bool,
    pub versions: Vec<VersionSection>,
}

impl BranchSection {
    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionSection {
    /// Slot in the stored list, oldest first. Deletion targets this, not the text.
    pub index: usize,
    pub number: usize,
    pub header: String,
    pub age: String,
    pub text: String,
    pub timestamp: EpochMillis,
    pub expanded: bool,
}

impl VersionSection {
    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }
}

pub fn format_time_ago(now: EpochMillis, timestamp: EpochMillis) -> String {
    let seconds = now.saturating_sub(timestamp).div_euclid(1_000);
    if seconds < 60 {
        return format!("{seconds}s ago");
    }
    format!("{}m ago", seconds.div_euclid(60))
}

/// Stable sort: branches with equal latest timestamps keep their input order.
pub fn sort_by_latest(branches: &mut [BranchDrafts]) {
    branches.sort_by_key(|b| std::cmp::Reverse(b.latest_timestamp()));
}

pub fn render(mut branches: Vec<BranchDrafts>, now: EpochMillis) -> DraftListView {
    if branches.is_empty() {
        return DraftListView::Empty {
            message: NO_DRAFTS_MESSAGE.to_string(),
        };
    }
    sort_by_latest(&mut branches);

    let branches = branches
        .into_iter()
        .map(|b| {
            let count = b.history.len();
            let versions = b
                .history
                .newest_first()
                .enumerate()
                .map(|(position, (index, version))| {
                    let number = count - position;
                    let age = format_time_ago(now, version.timestamp);
                    VersionSection {
                        index,
                        number,
                        header: format!("Version {number} • {age}"),
                        age,
                        text: version.text.clone(),
                        timestamp: version.timestamp,
                        expanded: true,
                    }
                })
                .collect();
            BranchSection {
                header: format!("Branch: {}", b.branch),
                branch: b.branch,
                info: VERSION_LIMIT_INFO.to_string(),
                expanded: true,
                versions,
            }
        })
        .collect();

    DraftListView::Branches { branches }
}
