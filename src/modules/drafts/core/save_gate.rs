// Pure save-gate predicate.
//
// Purpose
// - Throttle redundant saves of unchanged text while letting edited text through at once.
//
// Responsibilities
// - Decide only from (last text, last save time, new text, now). No input or output.

use crate::shared::core::primitives::EpochMillis;

pub const MIN_SAVE_GAP_MS: i64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveGate {
    pub min_gap_ms: i64,
}

impl Default for SaveGate {
    fn default() -> Self {
        Self {
            min_gap_ms: MIN_SAVE_GAP_MS,
        }
    }
}

impl SaveGate {
    pub fn new(min_gap_ms: i64) -> Self {
        Self { min_gap_ms }
    }

    pub fn allows(
        &self,
        last_text: &str,
        last_time: EpochMillis,
        new_text: &str,
        now: EpochMillis,
    ) -> bool {
        !(new_text == last_text && now - last_time < self.min_gap_ms)
    }
}
