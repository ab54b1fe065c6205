use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

use crate::flash::{self, Flash};
use crate::gate;
use super::auth::ServerState;

/// Page view body: `{page, user, flash}` plus the page's own fields.
pub(crate) fn render(page: &str, user: Option<&str>, flash: Option<Flash>, data: Value) -> Json<Value> {
    let mut body = json!({ "page": page, "user": user, "flash": flash });
    if let (Value::Object(fields), Value::Object(extra)) = (&mut body, data) {
        fields.extend(extra);
    }
    Json(body)
}

/// Render `page`, consuming any pending notice from `jar`.
pub(crate) fn view(jar: CookieJar, page: &str, user: Option<&str>, data: Value) -> (CookieJar, Json<Value>) {
    let (jar, flash) = flash::take(jar);
    (jar, render(page, user, flash, data))
}

fn public_page(state: &ServerState, jar: CookieJar, page: &str) -> (CookieJar, Json<Value>) {
    let user = gate::identity(state, &jar);
    view(jar, page, user.as_deref(), Value::Null)
}

pub async fn index(State(state): State<ServerState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    public_page(&state, jar, "index")
}

pub async fn about(State(state): State<ServerState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    public_page(&state, jar, "about")
}

pub async fn contact(State(state): State<ServerState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    public_page(&state, jar, "contact")
}
