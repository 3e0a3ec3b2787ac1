// File-backed editor.
//
// Purpose
// - Let the capture agent autosave a description kept in a plain text file.
//
// Responsibilities
// - The editor "appears" once the watched file exists, detected through filesystem events.
// - After that, every content change reported by the watcher is an input event.
// - Read failures read as an empty field; write failures are logged.

use crate::modules::drafts::core::ports::{AttachedEditor, Editor, EditorSource, InputEvent};
use async_trait::async_trait;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub struct FileEditor {
    path: PathBuf,
}

impl FileEditor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Editor for FileEditor {
    async fn text(&self) -> String {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "editor file unreadable");
                String::new()
            }
        }
    }

    async fn set_text(&self, text: &str) {
        if let Err(err) = tokio::fs::write(&self.path, text).await {
            warn!(path = %self.path.display(), error = %err, "failed to write editor file");
        }
    }
}

pub struct FileEditorSource {
    path: PathBuf,
}

impl FileEditorSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Watches the file's directory, since the file itself may not exist yet.
    fn watch_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

fn touches_file(path: &Path, event: &Event) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event.paths.iter().any(|p| p.file_name() == path.file_name())
}

#[async_trait]
impl EditorSource for FileEditorSource {
    async fn editor_appeared(&mut self) -> Option<AttachedEditor> {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let mut watcher = match RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let _ = event_tx.send(res);
            },
            notify::Config::default(),
        ) {
            Ok(watcher) => watcher,
            Err(err) => {
                error!(error = %err, "failed to create editor file watcher");
                return None;
            }
        };
        let dir = self.watch_dir();
        if let Err(err) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
            error!(dir = %dir.display(), error = %err, "failed to watch editor directory");
            return None;
        }

        // Armed before the check so a file created in between is still seen.
        while !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            if let Err(err) = event_rx.recv().await? {
                warn!(error = %err, "editor watch error");
            }
        }
        info!(path = %self.path.display(), "editor file detected");

        let editor = Arc::new(FileEditor::new(self.path.clone()));
        let (input_tx, input_events) = mpsc::unbounded_channel();
        let seen = editor.text().await;
        let changes = FileChanges {
            path: self.path.clone(),
            _watcher: watcher,
            events: event_rx,
        };
        tokio::spawn(changes.forward(editor.clone(), input_tx, seen));
        Some(AttachedEditor {
            editor,
            input_events,
        })
    }
}

/// Filesystem events for the attached editor file. Dropping it stops the watcher.
struct FileChanges {
    path: PathBuf,
    _watcher: RecommendedWatcher,
    events: mpsc::UnboundedReceiver<notify::Result<Event>>,
}

impl FileChanges {
    /// Turns content changes into input events until the agent stops listening.
    async fn forward(
        mut self,
        editor: Arc<FileEditor>,
        input_tx: mpsc::UnboundedSender<InputEvent>,
        mut seen: String,
    ) {
        while let Some(res) = self.events.recv().await {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    warn!(error = %err, "editor watch error");
                    continue;
                }
            };
            if !touches_file(&self.path, &event) {
                continue;
            }
            // Metadata-only events and our own writes of the same text are not input.
            let current = editor.text().await;
            if current == seen {
                continue;
            }
            seen = current;
            if input_tx.send(InputEvent).is_err() {
                debug!("input listener gone, stopping editor watch");
                break;
            }
        }
    }
}

#[cfg(test)]
mod file_editor_tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;

    #[rstest]
    #[tokio::test]
    async fn it_should_read_and_write_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let editor = FileEditor::new(dir.path().join("description.md"));
        assert_eq!(editor.text().await, "");
        editor.set_text("Fixes the login flow").await;
        assert_eq!(editor.text().await, "Fixes the login flow");
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_appear_once_the_file_exists_and_report_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("description.md");
        let mut source = FileEditorSource::new(&path);

        // Rename into place so the file appears with its full content.
        let staged = dir.path().join("description.md.tmp");
        let writer_path = path.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            tokio::fs::write(&staged, "first").await.unwrap();
            tokio::fs::rename(&staged, &writer_path).await.unwrap();
        });

        let mut attached = source.editor_appeared().await.expect("editor should appear");
        assert_eq!(attached.editor.text().await, "first");

        tokio::fs::write(&path, "second").await.unwrap();
        let event = tokio::time::timeout(Duration::from_secs(2), attached.input_events.recv())
            .await
            .expect("no input event");
        assert_eq!(event, Some(InputEvent));
    }
}
