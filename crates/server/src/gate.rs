//! Access gate: resolves the session cookie into a request-scoped identity.

use axum::{extract::{Request, State}, middleware::Next, response::{IntoResponse, Response}};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, warn};

use crate::errors::{Rejection, WebError};
use crate::routes::auth::ServerState;

pub const SESSION_COOKIE: &str = "auth_token";

/// Username of the logged-in caller, inserted by [`require_login`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser(pub String);

/// Identity for pages that render with or without a session.
pub fn identity(state: &ServerState, jar: &CookieJar) -> Option<String> {
    let token = jar.get(SESSION_COOKIE)?;
    match state.auth.verify_session(token.value()) {
        Ok(username) => Some(username),
        Err(e) => {
            debug!(error = %e, "ignoring invalid session cookie");
            None
        }
    }
}

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Removal counterpart of [`session_cookie`]; path must match for browsers to drop it.
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

/// Accept `next` only when it stays on this site.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}

/// Middleware for routes that need a logged-in user. Without a valid session
/// the caller is sent to `/login?next=<path>`.
pub async fn require_login(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match identity(&state, &jar) {
        Some(username) => {
            req.extensions_mut().insert(CurrentUser(username));
            next.run(req).await
        }
        None => {
            let path = req.uri().path().to_string();
            warn!(path = %path, "login required");
            Rejection { error: WebError::AuthRequired, redirect_to: format!("/login?next={}", path) }.into_response()
        }
    }
}
