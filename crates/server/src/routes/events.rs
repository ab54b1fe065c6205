use axum::{extract::{Path, State}, response::Response, Extension, Form, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};

use models::event_booking::{BookingFields, NAME_TAKEN, SLOT_TAKEN};
use service::errors::ServiceError;
use service::event_registry;

use crate::errors::{OrRedirect, Rejection, WebError};
use crate::flash::{redirect_with, Flash};
use crate::gate::CurrentUser;
use super::auth::ServerState;
use super::pages::view;
use super::row_id;

const EVENTS_PAGE: &str = "/book_event";

#[derive(Debug, Deserialize)]
pub struct EventForm {
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub event_date: String,
    #[serde(default)]
    pub event_time: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub participants: Option<String>,
}

/// Blank or missing counts default to 1.
fn parse_count(field: &str, raw: Option<&str>) -> Result<i32, WebError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(1),
        Some(v) => v.parse::<i32>().map_err(|_| WebError::Validation(format!("{} must be a whole number", field))),
    }
}

impl EventForm {
    pub fn into_fields(self) -> Result<BookingFields, WebError> {
        let duration = parse_count("duration", self.duration.as_deref())?;
        let participants = parse_count("participants", self.participants.as_deref())?;
        Ok(BookingFields {
            event_name: self.event_name,
            event_date: self.event_date,
            event_time: self.event_time,
            duration,
            participants,
        })
    }
}

fn booking_error(e: ServiceError) -> WebError {
    match e {
        ServiceError::Conflict(msg) if msg == SLOT_TAKEN => {
            WebError::Conflict("You already have an event at this date and time!".into())
        }
        ServiceError::Conflict(msg) if msg == NAME_TAKEN => {
            WebError::Conflict("You already have an event with this name!".into())
        }
        ServiceError::NotFound(_) => WebError::NotFound("Event not found.".into()),
        other => other.into(),
    }
}

pub async fn book_event_page(
    State(state): State<ServerState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), Rejection> {
    let events = event_registry::list(&state.db, &owner).await.or_redirect("/")?;
    Ok(view(jar, "book_event", Some(&owner), json!({ "events": events })))
}

pub async fn book_event(
    State(state): State<ServerState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Form(form): Form<EventForm>,
) -> Result<Response, Rejection> {
    let fields = form.into_fields().or_redirect(EVENTS_PAGE)?;
    event_registry::create(&state.db, &owner, &fields)
        .await
        .map_err(booking_error)
        .or_redirect(EVENTS_PAGE)?;
    Ok(redirect_with(CookieJar::new(), Flash::success("Event booked successfully!"), EVENTS_PAGE))
}

pub async fn edit_event_page(
    State(state): State<ServerState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), Rejection> {
    let id = row_id(id, "event").map_err(booking_error).or_redirect(EVENTS_PAGE)?;
    let event = event_registry::get(&state.db, &owner, id)
        .await
        .and_then(|found| found.ok_or_else(|| ServiceError::not_found("event")))
        .map_err(booking_error)
        .or_redirect(EVENTS_PAGE)?;
    Ok(view(jar, "edit_event", Some(&owner), json!({ "event": event })))
}

pub async fn edit_event(
    State(state): State<ServerState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Form(form): Form<EventForm>,
) -> Result<Response, Rejection> {
    let id = row_id(id, "event").map_err(booking_error).or_redirect(EVENTS_PAGE)?;
    let fields = form.into_fields().or_redirect(EVENTS_PAGE)?;
    event_registry::update(&state.db, &owner, id, &fields)
        .await
        .map_err(booking_error)
        .or_redirect(EVENTS_PAGE)?;
    Ok(redirect_with(CookieJar::new(), Flash::success("Event updated successfully!"), EVENTS_PAGE))
}

pub async fn delete_event(
    State(state): State<ServerState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Response, Rejection> {
    if let Ok(id) = row_id(id, "event") {
        event_registry::delete(&state.db, &owner, id).await.or_redirect(EVENTS_PAGE)?;
    }
    Ok(redirect_with(CookieJar::new(), Flash::success("Event deleted successfully!"), EVENTS_PAGE))
}
