// Capped, ordered list of versions for one branch.
//
// Responsibilities
// - Keep versions oldest first, evicting from the front past MAX_VERSIONS.
// - Suppress consecutive duplicates on append.
// - Decode stored values leniently: anything that is not a list of versions is an empty history.

use crate::modules::drafts::core::version::Version;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

pub const MAX_VERSIONS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftHistory(Vec<Version>);

impl DraftHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_versions(versions: Vec<Version>) -> Self {
        Self(versions)
    }

    pub fn from_stored(value: Value) -> Self {
        if !value.is_array() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_else(|err| {
            warn!(error = %err, "ignoring stored draft history that does not decode");
            Self::default()
        })
    }

    pub fn to_stored(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|v| json!({ "text": v.text, "timestamp": v.timestamp }))
                .collect(),
        )
    }

    pub fn versions(&self) -> &[Version] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn latest(&self) -> Option<&Version> {
        self.0.last()
    }

    pub fn exceeds_cap(&self) -> bool {
        self.0.len() > MAX_VERSIONS
    }

    /// Appends unless the latest entry already carries the same text.
    pub fn push_if_changed(&mut self, version: Version) -> bool {
        if self.latest().is_some_and(|last| last.text == version.text) {
            return false;
        }
        self.0.push(version);
        true
    }

    /// Drops the oldest entries until at most MAX_VERSIONS remain. Returns whether anything was dropped.
    pub fn truncate_to_cap(&mut self) -> bool {
        if !self.exceeds_cap() {
            return false;
        }
        let excess = self.0.len() - MAX_VERSIONS;
        self.0.drain(..excess);
        true
    }

    pub fn capped(mut self) -> Self {
        self.truncate_to_cap();
        self
    }

    /// Removes the entry at `index` (oldest first). Identity is the slot, never the text.
    pub fn remove_at(&mut self, index: usize) -> Option<Version> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    /// Newest first, paired with each entry's slot index.
    pub fn newest_first(&self) -> impl Iterator<Item = (usize, &Version)> {
        self.0.iter().enumerate().rev()
    }
}
