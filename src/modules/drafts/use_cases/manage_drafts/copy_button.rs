use crate::modules::drafts::core::ports::Clipboard;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::warn;

pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "Copied!";
pub const COPIED_FEEDBACK: Duration = Duration::from_secs(1);

/// Copy action with transient "copied" feedback on its label.
#[derive(Clone)]
pub struct CopyButton {
    label: Arc<RwLock<&'static str>>,
    feedback: Duration,
}

impl Default for CopyButton {
    fn default() -> Self {
        Self::new()
    }
}

impl CopyButton {
    pub fn new() -> Self {
        Self {
            label: Arc::new(RwLock::new(COPY_LABEL)),
            feedback: COPIED_FEEDBACK,
        }
    }

    pub async fn label(&self) -> &'static str {
        *self.label.read().await
    }

    /// Writes `text` to the clipboard. On success the label reads "Copied!" until the feedback
    /// period passes. Failures leave the label alone.
    pub async fn copy(&self, clipboard: &dyn Clipboard, text: &str) -> bool {
        if let Err(err) = clipboard.write_text(text).await {
            warn!(error = %err, "failed to copy draft version");
            return false;
        }
        *self.label.write().await = COPIED_LABEL;

        let label = self.label.clone();
        let feedback = self.feedback;
        tokio::spawn(async move {
            tokio::time::sleep(feedback).await;
            *label.write().await = COPY_LABEL;
        });
        true
    }
}
