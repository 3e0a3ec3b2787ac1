use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::modules::drafts::use_cases::manage_drafts::inbound::http as manage_http;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/drafts", get(manage_http::list).delete(manage_http::clear_all))
        .route("/drafts/{branch}", delete(manage_http::delete_branch))
        .route(
            "/drafts/{branch}/versions/{index}",
            delete(manage_http::delete_version),
        )
        .route(
            "/drafts/{branch}/versions/{index}/copy",
            post(manage_http::copy_version),
        )
        .route("/export", get(manage_http::export))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
