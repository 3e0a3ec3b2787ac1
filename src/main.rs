use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

use pr_drafts::modules::drafts::adapters::outbound::clipboard::{
    CommandClipboard, InMemoryClipboard,
};
use pr_drafts::modules::drafts::adapters::outbound::file_editor::FileEditorSource;
use pr_drafts::modules::drafts::adapters::outbound::static_page::StaticPage;
use pr_drafts::modules::drafts::core::ports::Clipboard;
use pr_drafts::modules::drafts::use_cases::capture_draft::agent::CaptureAgent;
use pr_drafts::modules::drafts::use_cases::capture_draft::runner::detect_editor;
use pr_drafts::modules::drafts::use_cases::manage_drafts::handler::ManageDraftsHandler;
use pr_drafts::shared::core::primitives::{Clock, SystemClock};
use pr_drafts::shared::infrastructure::key_value_store::KeyValueStore;
use pr_drafts::shared::infrastructure::key_value_store::json_file::JsonFileStore;
use pr_drafts::shell::config::Config;
use pr_drafts::shell::http::router;
use pr_drafts::shell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::from_env()?;
    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(config.store_path.clone()));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let clipboard: Arc<dyn Clipboard> = match config
        .clipboard_command
        .as_deref()
        .and_then(CommandClipboard::from_command_line)
    {
        Some(command) => Arc::new(command),
        None => Arc::new(InMemoryClipboard::new()),
    };

    if let Some(editor_path) = config.editor_path.clone() {
        let mut page = StaticPage::new(config.page_url.clone());
        if let Some(branch) = &config.fallback_branch {
            page = page.with_fallback_branch(branch.clone());
        }
        let autosave = config.autosave();
        let agent = Arc::new(CaptureAgent::new(
            store.clone(),
            Arc::new(page),
            clock.clone(),
            autosave.save_gate(),
        ));
        tracing::info!(editor = %editor_path.display(), "waiting for editor");
        tokio::spawn(async move {
            let source = FileEditorSource::new(editor_path);
            // Triggers outlive the handle; they run until the process exits.
            detect_editor(agent, source, autosave).await;
        });
    }

    let state = AppState {
        drafts: Arc::new(ManageDraftsHandler::new(store, clock)),
        clipboard,
    };
    let app = router(state);

    tracing::info!(store = %config.store_path.display(), "drafts API: http://{}/drafts", config.http_addr);
    let listener = tokio::net::TcpListener::bind(config.http_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
