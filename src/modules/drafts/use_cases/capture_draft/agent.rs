// Capture agent: owns the autosave state for one page.
//
// Purpose
// - Persist debounced and periodic snapshots of the editor per branch, never exceeding the cap.
//
// Responsibilities
// - Keep an in-memory cache of branch histories, written through to the store.
// - Gate redundant saves, suppress consecutive duplicates, restore the latest version on startup.
// - Never fail towards the caller. Store failures are logged and the agent carries on.

use crate::modules::drafts::core::branch::resolve_branch_name;
use crate::modules::drafts::core::history::DraftHistory;
use crate::modules::drafts::core::ports::{Editor, PageContext};
use crate::modules::drafts::core::save_gate::SaveGate;
use crate::modules::drafts::core::storage_key::storage_key;
use crate::modules::drafts::core::version::Version;
use crate::shared::core::primitives::{Clock, EpochMillis};
use crate::shared::infrastructure::key_value_store::KeyValueStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    NoEditor,
    EmptyText,
    Throttled,
    Unchanged { branch: String },
    Saved { branch: String, total: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreOutcome {
    pub branch: String,
    pub versions: usize,
    pub injected: bool,
}

#[derive(Default)]
struct CaptureState {
    editor: Option<Arc<dyn Editor>>,
    branch_versions: HashMap<String, DraftHistory>,
    last_saved_text: String,
    last_save_time: EpochMillis,
}

pub struct CaptureAgent {
    store: Arc<dyn KeyValueStore>,
    page: Arc<dyn PageContext>,
    clock: Arc<dyn Clock>,
    gate: SaveGate,
    state: Mutex<CaptureState>,
}

impl CaptureAgent {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        page: Arc<dyn PageContext>,
        clock: Arc<dyn Clock>,
        gate: SaveGate,
    ) -> Self {
        Self {
            store,
            page,
            clock,
            gate,
            state: Mutex::new(CaptureState::default()),
        }
    }

    pub async fn attach(&self, editor: Arc<dyn Editor>) {
        self.state.lock().await.editor = Some(editor);
    }

    pub async fn is_active(&self) -> bool {
        self.state.lock().await.editor.is_some()
    }

    pub fn branch_name(&self) -> String {
        resolve_branch_name(self.page.as_ref())
    }

    pub async fn cached_history(&self, branch: &str) -> Option<DraftHistory> {
        self.state.lock().await.branch_versions.get(branch).cloned()
    }

    pub async fn save_snapshot(&self) -> SaveOutcome {
        let mut state = self.state.lock().await;
        let Some(editor) = state.editor.clone() else {
            return SaveOutcome::NoEditor;
        };

        let branch = self.branch_name();
        let text = editor.text().await.trim().to_string();
        if text.is_empty() {
            return SaveOutcome::EmptyText;
        }

        let now = self.clock.now_millis();
        if !self
            .gate
            .allows(&state.last_saved_text, state.last_save_time, &text, now)
        {
            debug!(branch = %branch, "save skipped: unchanged text within the minimum gap");
            return SaveOutcome::Throttled;
        }

        state.last_saved_text = text.clone();
        state.last_save_time = now;

        let history = state.branch_versions.entry(branch.clone()).or_default();
        if !history.push_if_changed(Version::new(text, now)) {
            return SaveOutcome::Unchanged { branch };
        }
        history.truncate_to_cap();
        let total = history.len();
        let stored = history.to_stored();

        match self.store.set(&storage_key(&branch), stored).await {
            Ok(()) => info!(branch = %branch, total, "saved draft version"),
            Err(err) => warn!(branch = %branch, error = %err, "failed to persist draft version"),
        }
        SaveOutcome::Saved { branch, total }
    }

    pub async fn restore_latest(&self) -> RestoreOutcome {
        let mut state = self.state.lock().await;
        let branch = self.branch_name();

        let history = match self.store.get(&storage_key(&branch)).await {
            Ok(Some(value)) => DraftHistory::from_stored(value),
            Ok(None) => DraftHistory::new(),
            Err(err) => {
                warn!(branch = %branch, error = %err, "failed to load draft history");
                DraftHistory::new()
            }
        };
        let versions = history.len();
        let latest = history.latest().map(|v| v.text.clone());
        state.branch_versions.insert(branch.clone(), history);

        let mut injected = false;
        if let (Some(text), Some(editor)) = (latest, state.editor.clone()) {
            if editor.text().await.trim().is_empty() {
                editor.set_text(&text).await;
                state.last_saved_text = text;
                injected = true;
                info!(branch = %branch, "restored latest draft version");
            }
        }

        RestoreOutcome {
            branch,
            versions,
            injected,
        }
    }

    /// Truncates and rewrites every cached history over the cap. Returns how many were rewritten.
    pub async fn sweep_all_branches(&self) -> usize {
        let mut state = self.state.lock().await;
        let mut rewritten = 0;
        for (branch, history) in state.branch_versions.iter_mut() {
            if !history.truncate_to_cap() {
                continue;
            }
            rewritten += 1;
            if let Err(err) = self.store.set(&storage_key(branch), history.to_stored()).await {
                warn!(branch = %branch, error = %err, "failed to persist swept draft history");
            }
        }
        if rewritten > 0 {
            info!(rewritten, "swept draft histories over the cap");
        }
        rewritten
    }
}

#[cfg(test)]
mod capture_agent_tests {
    use super::*;
    use crate::modules::drafts::adapters::outbound::in_memory_editor::InMemoryEditor;
    use crate::modules::drafts::adapters::outbound::static_page::StaticPage;
    use crate::modules::drafts::core::history::MAX_VERSIONS;
    use crate::shared::core::primitives::ManualClock;
    use crate::shared::infrastructure::key_value_store::in_memory::InMemoryKeyValueStore;
    use crate::test_support::fixtures::drafts::{history_of, stored_history};
    use rstest::{fixture, rstest};

    const PAGE_URL: &str = "https://bb.example/pr/new?sourceBranch=refs%2Fheads%2Ffeature%2Fsearch";
    const KEY: &str = "bitbucket_pr_description_search";

    struct Harness {
        agent: CaptureAgent,
        editor: Arc<InMemoryEditor>,
        store: Arc<InMemoryKeyValueStore>,
        clock: Arc<ManualClock>,
    }

    fn harness_with(store: InMemoryKeyValueStore) -> Harness {
        let store = Arc::new(store);
        let clock = Arc::new(ManualClock::new(0));
        let (editor, _attached) = InMemoryEditor::new();
        let agent = CaptureAgent::new(
            store.clone(),
            Arc::new(StaticPage::new(PAGE_URL)),
            clock.clone(),
            SaveGate::default(),
        );
        Harness {
            agent,
            editor,
            store,
            clock,
        }
    }

    #[fixture]
    fn before_each() -> Harness {
        harness_with(InMemoryKeyValueStore::new())
    }

    async fn stored(h: &Harness) -> DraftHistory {
        DraftHistory::from_stored(h.store.get(KEY).await.unwrap().unwrap_or_default())
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_not_save_without_an_editor(before_each: Harness) {
        let h = before_each;
        assert_eq!(h.agent.save_snapshot().await, SaveOutcome::NoEditor);
        assert!(!h.agent.is_active().await);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_not_save_blank_text(before_each: Harness) {
        let h = before_each;
        h.agent.attach(h.editor.clone()).await;
        h.editor.set_text("  \n ").await;
        assert_eq!(h.agent.save_snapshot().await, SaveOutcome::EmptyText);
        assert_eq!(h.store.get(KEY).await.unwrap(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_save_trimmed_text_under_the_branch_key(before_each: Harness) {
        let h = before_each;
        h.agent.attach(h.editor.clone()).await;
        h.clock.set(1_000);
        h.editor.set_text("  Adds search  ").await;

        let outcome = h.agent.save_snapshot().await;

        assert_eq!(
            outcome,
            SaveOutcome::Saved {
                branch: "search".into(),
                total: 1
            }
        );
        assert_eq!(stored(&h).await, history_of(&[("Adds search", 1_000)]));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_throttle_a_repeat_then_append_new_text() {
        let h = harness_with(InMemoryKeyValueStore::with_entries([(
            KEY.to_string(),
            stored_history(&[("a", 1_000), ("b", 2_000)]),
        )]));
        h.agent.attach(h.editor.clone()).await;
        h.editor.set_text("b").await;
        h.agent.restore_latest().await;
        // Restoring into a non-empty editor leaves the trackers alone; align them with the last save.
        h.clock.set(2_000);
        assert_eq!(
            h.agent.save_snapshot().await,
            SaveOutcome::Unchanged {
                branch: "search".into()
            }
        );

        h.clock.set(3_000);
        assert_eq!(h.agent.save_snapshot().await, SaveOutcome::Throttled);
        assert_eq!(stored(&h).await.len(), 2);

        h.clock.set(7_000);
        h.editor.set_text("c").await;
        assert_eq!(
            h.agent.save_snapshot().await,
            SaveOutcome::Saved {
                branch: "search".into(),
                total: 3
            }
        );
        assert_eq!(
            stored(&h).await,
            history_of(&[("a", 1_000), ("b", 2_000), ("c", 7_000)])
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_suppress_duplicates_after_the_gap_elapses(before_each: Harness) {
        let h = before_each;
        h.agent.attach(h.editor.clone()).await;
        h.editor.set_text("same").await;
        h.clock.set(1_000);
        h.agent.save_snapshot().await;

        h.clock.set(1_000 + 6_000);
        assert_eq!(
            h.agent.save_snapshot().await,
            SaveOutcome::Unchanged {
                branch: "search".into()
            }
        );
        assert_eq!(stored(&h).await.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_save_edited_text_inside_the_gap(before_each: Harness) {
        let h = before_each;
        h.agent.attach(h.editor.clone()).await;
        h.editor.set_text("first").await;
        h.clock.set(1_000);
        h.agent.save_snapshot().await;

        h.editor.set_text("second").await;
        h.clock.set(1_100);
        assert!(matches!(
            h.agent.save_snapshot().await,
            SaveOutcome::Saved { total: 2, .. }
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_never_persist_more_than_the_cap(before_each: Harness) {
        let h = before_each;
        h.agent.attach(h.editor.clone()).await;
        for i in 0..25 {
            h.clock.set(i * 10);
            h.editor.set_text(&format!("draft {i}")).await;
            h.agent.save_snapshot().await;
            let history = stored(&h).await;
            assert!(history.len() <= MAX_VERSIONS);
            assert!(
                history
                    .versions()
                    .windows(2)
                    .all(|w| w[0].timestamp <= w[1].timestamp)
            );
        }
        assert_eq!(stored(&h).await.versions()[0].text, "draft 15");
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_restore_the_latest_version_into_an_empty_editor() {
        let h = harness_with(InMemoryKeyValueStore::with_entries([(
            KEY.to_string(),
            stored_history(&[("older", 1_000), ("latest\nline two", 2_000)]),
        )]));
        h.agent.attach(h.editor.clone()).await;

        let outcome = h.agent.restore_latest().await;

        assert_eq!(
            outcome,
            RestoreOutcome {
                branch: "search".into(),
                versions: 2,
                injected: true
            }
        );
        assert_eq!(h.editor.text().await, "latest\nline two");
        // The restored text counts as last saved, so an immediate save is throttled.
        h.clock.set(1);
        assert_eq!(h.agent.save_snapshot().await, SaveOutcome::Throttled);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_not_overwrite_a_non_empty_editor_on_restore() {
        let h = harness_with(InMemoryKeyValueStore::with_entries([(
            KEY.to_string(),
            stored_history(&[("saved", 1_000)]),
        )]));
        h.agent.attach(h.editor.clone()).await;
        h.editor.set_text("typed already").await;

        let outcome = h.agent.restore_latest().await;

        assert!(!outcome.injected);
        assert_eq!(h.editor.text().await, "typed already");
        assert_eq!(
            h.agent.cached_history("search").await,
            Some(history_of(&[("saved", 1_000)]))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_restore_nothing_from_an_unusable_value() {
        let h = harness_with(InMemoryKeyValueStore::with_entries([(
            KEY.to_string(),
            serde_json::json!("corrupt"),
        )]));
        h.agent.attach(h.editor.clone()).await;
        let outcome = h.agent.restore_latest().await;
        assert_eq!(outcome.versions, 0);
        assert!(!outcome.injected);
        assert_eq!(h.editor.text().await, "");
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_degrade_silently_when_the_store_is_offline() {
        let mut store = InMemoryKeyValueStore::new();
        store.toggle_offline();
        let h = harness_with(store);
        h.agent.attach(h.editor.clone()).await;

        let restored = h.agent.restore_latest().await;
        assert_eq!(restored.versions, 0);

        h.editor.set_text("kept in memory").await;
        h.clock.set(10_000);
        assert!(matches!(
            h.agent.save_snapshot().await,
            SaveOutcome::Saved { total: 1, .. }
        ));
        assert_eq!(
            h.agent.cached_history("search").await.map(|c| c.len()),
            Some(1)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_sweep_histories_over_the_cap() {
        let oversized: Vec<(String, i64)> = (0..13).map(|i| (format!("v{i}"), i)).collect();
        let refs: Vec<(&str, i64)> = oversized.iter().map(|(t, i)| (t.as_str(), *i)).collect();
        let h = harness_with(InMemoryKeyValueStore::with_entries([(
            KEY.to_string(),
            stored_history(&refs),
        )]));
        h.agent.restore_latest().await;
        assert_eq!(h.agent.cached_history("search").await.unwrap().len(), 13);

        assert_eq!(h.agent.sweep_all_branches().await, 1);
        let history = stored(&h).await;
        assert_eq!(history.len(), MAX_VERSIONS);
        assert_eq!(history.versions()[0].text, "v3");

        assert_eq!(h.agent.sweep_all_branches().await, 0);
    }
}
