use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::modules::drafts::core::ports::Confirmed;
use crate::modules::drafts::use_cases::manage_drafts::copy_button::CopyButton;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct ConfirmParams {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Serialize)]
pub struct CopyResponse {
    pub copied: bool,
    /// The button label right after the copy. Each request gets its own button, so this is a
    /// snapshot; the revert to "Copy" is left to the client.
    pub label: String,
}

pub async fn list(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.drafts.list_drafts().await)
}

pub async fn delete_branch(
    State(state): State<AppState>,
    Path(branch): Path<String>,
    Query(params): Query<ConfirmParams>,
) -> impl IntoResponse {
    match state
        .drafts
        .delete_branch(&branch, &Confirmed(params.confirm))
        .await
    {
        Some(view) => Json(view).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

pub async fn delete_version(
    State(state): State<AppState>,
    Path((branch, index)): Path<(String, usize)>,
) -> impl IntoResponse {
    Json(state.drafts.delete_version(&branch, index).await)
}

pub async fn copy_version(
    State(state): State<AppState>,
    Path((branch, index)): Path<(String, usize)>,
) -> impl IntoResponse {
    let button = CopyButton::new();
    match state
        .drafts
        .copy_version(&branch, index, state.clipboard.as_ref(), &button)
        .await
    {
        Some(copied) => Json(CopyResponse {
            copied,
            label: button.label().await.to_string(),
        })
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn export(State(state): State<AppState>) -> impl IntoResponse {
    let file = state.drafts.export_all().await;
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        file.content,
    )
}

pub async fn clear_all(
    State(state): State<AppState>,
    Query(params): Query<ConfirmParams>,
) -> impl IntoResponse {
    match state.drafts.clear_all(&Confirmed(params.confirm)).await {
        Some(view) => Json(view).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
