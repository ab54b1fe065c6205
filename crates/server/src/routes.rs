use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure};
use tracing::Level;

use common::types::Health;
use service::errors::ServiceError;

use crate::gate;

pub mod auth;
pub mod clubs;
pub mod events;
pub mod pages;

use auth::ServerState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Ids arrive as any integer; one outside the key range cannot name a row.
pub(crate) fn row_id(raw: i64, entity: &str) -> Result<i32, ServiceError> {
    i32::try_from(raw).map_err(|_| ServiceError::not_found(entity))
}

/// Build the full application router: public pages, auth, and the gated
/// club and event routes.
pub fn build_router(state: ServerState) -> Router {
    let public = Router::new()
        .route("/", get(pages::index))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
        .route("/health", get(health))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout).post(auth::logout));

    // Everything below needs a session; the gate injects `CurrentUser`.
    let gated = Router::new()
        .route("/join_club", get(clubs::join_club_page).post(clubs::join_club))
        .route("/edit_club/:id", get(clubs::edit_club_page).post(clubs::edit_club))
        .route("/delete_club/:id", post(clubs::delete_club))
        .route("/book_event", get(events::book_event_page).post(events::book_event))
        .route("/edit_event/:id", get(events::edit_event_page).post(events::edit_event))
        .route("/delete_event/:id", post(events::delete_event))
        .route_layer(middleware::from_fn_with_state(state.clone(), gate::require_login));

    public
        .merge(gated)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
