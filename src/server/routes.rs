use super::handlers::{
    chat_answer, chat_restart, create_session, export_universities, get_assessment, get_chat,
    get_filters, get_page, health, list_languages, list_universities, reload_data, set_language,
    submit_assessment,
};
use super::AppState;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Per-session routes, nested under `/api/sessions/:id`.
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/language", put(set_language))
        .route("/pages/:page", get(get_page))
        .route("/filters", get(get_filters))
        .route("/universities", get(list_universities))
        .route("/universities/export.csv", get(export_universities))
        .route("/assessment", get(get_assessment).post(submit_assessment))
        .route("/chat", get(get_chat))
        .route("/chat/answer", post(chat_answer))
        .route("/chat/restart", post(chat_restart))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/languages", get(list_languages))
        .route("/api/sessions", post(create_session))
        .nest("/api/sessions/:id", session_routes())
        .route("/admin/reload", post(reload_data))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
