use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use thiserror::Error;
use tracing::error;

use service::auth::errors::AuthError;
use service::errors::ServiceError;

use crate::flash::{self, Flash};

/// Every failure a request can end in. All of them are recovered into a
/// danger notice plus a redirect; none reach the client as a raw error.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid username or password")]
    Auth,
    #[error("Please log in to access this page.")]
    AuthRequired,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl WebError {
    /// Text shown to the user. Internal details stay in the log.
    pub fn notice(&self) -> String {
        match self {
            WebError::Internal(_) => "Something went wrong, please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ServiceError> for WebError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => WebError::Validation(msg),
            ServiceError::NotFound(msg) => WebError::NotFound(msg),
            ServiceError::Conflict(msg) => WebError::Conflict(msg),
            ServiceError::Db(msg) => WebError::Internal(msg),
        }
    }
}

impl From<AuthError> for WebError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => WebError::Validation(msg),
            AuthError::Conflict => WebError::Conflict("Username or email already exists!".into()),
            AuthError::Unauthorized => WebError::Auth,
            other => WebError::Internal(format!("auth error {}: {}", other.code(), other)),
        }
    }
}

/// A `WebError` paired with the page the user is sent back to.
#[derive(Debug)]
pub struct Rejection {
    pub error: WebError,
    pub redirect_to: String,
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        if let WebError::Internal(detail) = &self.error {
            error!(error = %detail, redirect_to = %self.redirect_to, "request failed");
        }
        flash::redirect_with(CookieJar::new(), Flash::danger(self.error.notice()), &self.redirect_to)
    }
}

pub trait OrRedirect<T> {
    fn or_redirect(self, to: &str) -> Result<T, Rejection>;
}

impl<T, E: Into<WebError>> OrRedirect<T> for Result<T, E> {
    fn or_redirect(self, to: &str) -> Result<T, Rejection> {
        self.map_err(|e| Rejection { error: e.into(), redirect_to: to.to_string() })
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
}
