//! One-shot notices carried across a redirect in the `flash` cookie.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: Level::Success, message: message.into() }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self { level: Level::Danger, message: message.into() }
    }

    /// Cookie payload: `level|message`.
    fn encode(&self) -> String {
        let level = match self.level {
            Level::Success => "success",
            Level::Danger => "danger",
        };
        format!("{}|{}", level, self.message)
    }

    fn decode(raw: &str) -> Option<Self> {
        let (level, message) = raw.split_once('|')?;
        let level = match level {
            "success" => Level::Success,
            "danger" => Level::Danger,
            _ => return None,
        };
        Some(Self { level, message: message.to_string() })
    }
}

fn flash_cookie(value: String) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Queue `flash` for the next page view.
pub fn push(jar: CookieJar, flash: Flash) -> CookieJar {
    jar.add(flash_cookie(flash.encode()))
}

/// Consume the pending notice, if any. A malformed cookie is dropped silently.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(raw) = jar.get(FLASH_COOKIE).map(|c| c.value().to_string()) else {
        return (jar, None);
    };
    let jar = jar.remove(flash_cookie(String::new()));
    (jar, Flash::decode(&raw))
}

/// `303 See Other` to `to`, carrying `flash` and any cookie changes in `jar`.
pub fn redirect_with(jar: CookieJar, flash: Flash, to: &str) -> Response {
    (push(jar, flash), Redirect::to(to)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_survives_encoding() {
        let f = Flash::danger("Event not found.");
        assert_eq!(f.encode(), "danger|Event not found.");
        assert_eq!(Flash::decode(&f.encode()), Some(f));
    }

    #[test]
    fn message_may_contain_separator() {
        let f = Flash::decode("success|a|b").unwrap();
        assert_eq!(f.message, "a|b");
    }

    #[test]
    fn unknown_level_is_ignored() {
        assert_eq!(Flash::decode("info|hello"), None);
        assert_eq!(Flash::decode("no separator"), None);
    }

    #[test]
    fn take_removes_cookie() {
        let jar = CookieJar::new().add(Cookie::new(FLASH_COOKIE, "success|Login successful!"));
        let (jar, flash) = take(jar);
        assert_eq!(flash, Some(Flash::success("Login successful!")));
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn take_without_cookie_is_none() {
        let (_, flash) = take(CookieJar::new());
        assert!(flash.is_none());
    }
}
