// Ports describe what the drafts core needs from its host, without implementing it.
//
// Purpose
// - Editor, EditorSource and PageContext stand in for the host page the agent runs on.
// - Clipboard and Confirm stand in for the management surface's user interactions.
//
// Boundaries
// - No concrete input or output here. Adapters implement these traits in the adapters layer.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// The editable description field.
#[async_trait]
pub trait Editor: Send + Sync {
    /// The field's current text, untrimmed.
    async fn text(&self) -> String;

    async fn set_text(&self, text: &str);
}

/// Fired whenever the user changes the editor's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent;

pub struct AttachedEditor {
    pub editor: Arc<dyn Editor>,
    pub input_events: mpsc::UnboundedReceiver<InputEvent>,
}

/// Element-appeared event source, subscribed to once.
#[async_trait]
pub trait EditorSource: Send {
    /// Resolves when the editor first exists. `None` when the source stops before that.
    async fn editor_appeared(&mut self) -> Option<AttachedEditor>;
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("page unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of the host page used to infer the branch.
pub trait PageContext: Send + Sync {
    fn page_url(&self) -> Result<String, PageError>;

    /// Text content of the first element matching `selector`, if any.
    fn element_text(&self, selector: &str) -> Result<Option<String>, PageError>;
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable")]
    Unavailable,

    #[error("clipboard io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("clipboard command exited with {0}")]
    CommandFailed(String),
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Asks the user to confirm a destructive action.
pub trait Confirm: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

/// An answer given ahead of time, e.g. a `confirm=true` request flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmed(pub bool);

impl Confirm for Confirmed {
    fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}
