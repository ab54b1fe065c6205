#![allow(dead_code)]

use std::collections::BTreeMap;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use configs::SessionConfig;
use migration::MigratorTrait;
use serde_json::Value;
use tower::Service;

use server::{routes, startup};

/// Router over a fresh in-memory database.
pub async fn build_app() -> anyhow::Result<Router> {
    let db = models::db::connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    let session = SessionConfig { secret: "test-secret".into(), ..Default::default() };
    Ok(routes::build_router(startup::build_state(db, &session)))
}

/// Drives the router like a browser: remembers cookies between requests.
pub struct Browser {
    app: Router,
    cookies: BTreeMap<String, String>,
}

impl Browser {
    pub fn new(app: Router) -> Self {
        Self { app, cookies: BTreeMap::new() }
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn set_cookie(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    pub fn clear_cookies(&mut self) {
        self.cookies.clear();
    }

    pub async fn get(&mut self, uri: &str) -> anyhow::Result<Response<Body>> {
        let req = self.request("GET", uri).body(Body::empty())?;
        self.send(req).await
    }

    pub async fn post(&mut self, uri: &str, form: &str) -> anyhow::Result<Response<Body>> {
        let req = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))?;
        self.send(req).await
    }

    /// GET a page view and decode its JSON body.
    pub async fn page(&mut self, uri: &str) -> anyhow::Result<Value> {
        let resp = self.get(uri).await?;
        assert_eq!(resp.status(), StatusCode::OK, "GET {} was not a page view", uri);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn register(&mut self, username: &str, password: &str) -> anyhow::Result<Response<Body>> {
        self.post("/register", &format!("username={}&password={}", username, password)).await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> anyhow::Result<Response<Body>> {
        self.post("/login", &format!("username={}&password={}", username, password)).await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri);
        if !self.cookies.is_empty() {
            let header_value = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, header_value);
        }
        builder
    }

    async fn send(&mut self, req: Request<Body>) -> anyhow::Result<Response<Body>> {
        let resp = self.app.clone().call(req).await?;
        for raw in resp.headers().get_all(header::SET_COOKIE) {
            let raw = raw.to_str()?;
            let pair = raw.split(';').next().unwrap_or_default();
            let Some((name, value)) = pair.split_once('=') else { continue };
            if value.is_empty() || raw.contains("Max-Age=0") {
                self.cookies.remove(name.trim());
            } else {
                self.cookies.insert(name.trim().to_string(), value.to_string());
            }
        }
        Ok(resp)
    }
}

pub fn location(resp: &Response<Body>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Assert a `303 See Other` to `to`.
pub fn assert_redirect(resp: &Response<Body>, to: &str) {
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(resp), to);
}

pub fn flash_message(page: &Value) -> Option<&str> {
    page["flash"]["message"].as_str()
}
