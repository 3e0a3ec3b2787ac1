// In memory editor and a manually triggered element-appeared source.
//
// Purpose
// - Drive the capture agent without a host page, in tests and when embedding the crate.

use crate::modules::drafts::core::ports::{AttachedEditor, Editor, EditorSource, InputEvent};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc, oneshot};

pub struct InMemoryEditor {
    text: RwLock<String>,
    input_tx: mpsc::UnboundedSender<InputEvent>,
}

impl InMemoryEditor {
    /// A new empty editor and the attachment that carries its input events.
    pub fn new() -> (Arc<Self>, AttachedEditor) {
        let (input_tx, input_events) = mpsc::unbounded_channel();
        let editor = Arc::new(Self {
            text: RwLock::new(String::new()),
            input_tx,
        });
        let attached = AttachedEditor {
            editor: editor.clone(),
            input_events,
        };
        (editor, attached)
    }

    /// Replaces the content the way a user would, firing an input event.
    pub async fn type_text(&self, text: &str) {
        *self.text.write().await = text.to_string();
        let _ = self.input_tx.send(InputEvent);
    }
}

#[async_trait]
impl Editor for InMemoryEditor {
    async fn text(&self) -> String {
        self.text.read().await.clone()
    }

    async fn set_text(&self, text: &str) {
        *self.text.write().await = text.to_string();
    }
}

/// Mounts an editor into the paired [`ManualEditorSource`].
pub struct EditorMount(oneshot::Sender<AttachedEditor>);

impl EditorMount {
    pub fn mount(self, attached: AttachedEditor) {
        let _ = self.0.send(attached);
    }
}

pub struct ManualEditorSource(oneshot::Receiver<AttachedEditor>);

pub fn manual_editor_source() -> (EditorMount, ManualEditorSource) {
    let (tx, rx) = oneshot::channel();
    (EditorMount(tx), ManualEditorSource(rx))
}

#[async_trait]
impl EditorSource for ManualEditorSource {
    async fn editor_appeared(&mut self) -> Option<AttachedEditor> {
        (&mut self.0).await.ok()
    }
}

#[cfg(test)]
mod in_memory_editor_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn it_should_fire_an_input_event_when_typing() {
        let (editor, mut attached) = InMemoryEditor::new();
        editor.type_text("hello").await;
        assert_eq!(editor.text().await, "hello");
        assert_eq!(attached.input_events.recv().await, Some(InputEvent));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_not_fire_an_input_event_on_programmatic_writes() {
        let (editor, mut attached) = InMemoryEditor::new();
        editor.set_text("restored").await;
        assert_eq!(attached.editor.text().await, "restored");
        assert!(attached.input_events.try_recv().is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_deliver_the_mounted_editor() {
        let (mount, mut source) = manual_editor_source();
        let (_editor, attached) = InMemoryEditor::new();
        mount.mount(attached);
        assert!(source.editor_appeared().await.is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_end_when_the_mount_is_dropped() {
        let (mount, mut source) = manual_editor_source();
        drop(mount);
        assert!(source.editor_appeared().await.is_none());
    }
}
