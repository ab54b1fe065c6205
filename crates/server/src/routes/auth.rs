use std::sync::Arc;

use axum::{extract::{Query, State}, response::Response, Form, Json};
use axum_extra::extract::cookie::CookieJar;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::errors::AuthError;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::AuthService;

use crate::errors::{OrRedirect, Rejection, WebError};
use crate::flash::{redirect_with, Flash};
use crate::gate::{self, expired_session_cookie, safe_next, session_cookie};
use super::pages::view;

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    pub cookie_secure: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: String,
}

pub async fn login_page(State(state): State<ServerState>, jar: CookieJar, Query(q): Query<NextQuery>) -> (CookieJar, Json<Value>) {
    let user = gate::identity(&state, &jar);
    view(jar, "login", user.as_deref(), json!({ "next": safe_next(q.next.as_deref()) }))
}

pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Query(q): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> Result<Response, Rejection> {
    let input = LoginInput { username: form.username, password: form.password };
    let session = state
        .auth
        .login(input)
        .await
        .map_err(|e| match e {
            AuthError::Validation(_) => WebError::Validation("Enter both username and password".into()),
            other => other.into(),
        })
        .or_redirect("/login")?;

    let to = safe_next(q.next.as_deref()).unwrap_or("/").to_string();
    info!(username = %session.user.username, redirect_to = %to, "logged_in");
    let jar = jar.add(session_cookie(session.token, state.cookie_secure));
    Ok(redirect_with(jar, Flash::success("Login successful!"), &to))
}

pub async fn register_page(State(state): State<ServerState>, jar: CookieJar, Query(q): Query<NextQuery>) -> (CookieJar, Json<Value>) {
    let user = gate::identity(&state, &jar);
    view(jar, "register", user.as_deref(), json!({ "next": safe_next(q.next.as_deref()) }))
}

pub async fn register(State(state): State<ServerState>, Form(form): Form<RegisterForm>) -> Result<Response, Rejection> {
    let input = RegisterInput { username: form.username, email: form.email, password: form.password };
    state
        .auth
        .register(input)
        .await
        .map_err(|e| match e {
            AuthError::Validation(_) => WebError::Validation("Provide username and password".into()),
            other => other.into(),
        })
        .or_redirect("/register")?;
    Ok(redirect_with(CookieJar::new(), Flash::success("Registration successful! Please login."), "/login"))
}

/// Clears the session unconditionally.
pub async fn logout(jar: CookieJar) -> Response {
    let jar = jar.remove(expired_session_cookie());
    redirect_with(jar, Flash::success("You have been logged out."), "/")
}
