use crate::modules::drafts::core::ports::Clipboard;
use crate::modules::drafts::use_cases::manage_drafts::handler::ManageDraftsHandler;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub drafts: Arc<ManageDraftsHandler>,
    pub clipboard: Arc<dyn Clipboard>,
}
