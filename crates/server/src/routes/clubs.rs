use axum::{extract::{Path, State}, response::Response, Extension, Form, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};

use models::club_membership::MembershipFields;
use service::club_registry;
use service::errors::ServiceError;

use crate::errors::{OrRedirect, Rejection, WebError};
use crate::flash::{redirect_with, Flash};
use crate::gate::CurrentUser;
use super::auth::ServerState;
use super::pages::view;
use super::row_id;

const CLUBS_PAGE: &str = "/join_club";

#[derive(Debug, Deserialize)]
pub struct ClubForm {
    #[serde(default)]
    pub club: String,
    #[serde(default)]
    pub members: String,
    #[serde(default)]
    pub group_name: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl ClubForm {
    pub fn into_fields(self) -> Result<MembershipFields, WebError> {
        let members = self
            .members
            .trim()
            .parse::<i32>()
            .map_err(|_| WebError::Validation("members must be a whole number".into()))?;
        Ok(MembershipFields { club: self.club, members, group_name: self.group_name, reason: self.reason })
    }
}

fn club_error(e: ServiceError) -> WebError {
    match e {
        ServiceError::NotFound(_) => WebError::NotFound("Group not found.".into()),
        other => other.into(),
    }
}

pub async fn join_club_page(
    State(state): State<ServerState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), Rejection> {
    let groups = club_registry::list(&state.db, &owner).await.or_redirect("/")?;
    Ok(view(jar, "join_club", Some(&owner), json!({ "groups": groups })))
}

pub async fn join_club(
    State(state): State<ServerState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Form(form): Form<ClubForm>,
) -> Result<Response, Rejection> {
    let fields = form.into_fields().or_redirect(CLUBS_PAGE)?;
    club_registry::create(&state.db, &owner, &fields).await.or_redirect(CLUBS_PAGE)?;
    Ok(redirect_with(CookieJar::new(), Flash::success("You joined the club successfully!"), CLUBS_PAGE))
}

pub async fn edit_club_page(
    State(state): State<ServerState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), Rejection> {
    let id = row_id(id, "group").map_err(club_error).or_redirect(CLUBS_PAGE)?;
    let group = club_registry::get(&state.db, &owner, id)
        .await
        .and_then(|found| found.ok_or_else(|| ServiceError::not_found("group")))
        .map_err(club_error)
        .or_redirect(CLUBS_PAGE)?;
    Ok(view(jar, "edit_club", Some(&owner), json!({ "group": group })))
}

pub async fn edit_club(
    State(state): State<ServerState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Form(form): Form<ClubForm>,
) -> Result<Response, Rejection> {
    let id = row_id(id, "group").map_err(club_error).or_redirect(CLUBS_PAGE)?;
    let fields = form.into_fields().or_redirect(CLUBS_PAGE)?;
    club_registry::update(&state.db, &owner, id, &fields)
        .await
        .map_err(club_error)
        .or_redirect(CLUBS_PAGE)?;
    Ok(redirect_with(CookieJar::new(), Flash::success("Group updated successfully!"), CLUBS_PAGE))
}

/// Reports success whether or not a row was removed.
pub async fn delete_club(
    State(state): State<ServerState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Response, Rejection> {
    if let Ok(id) = row_id(id, "group") {
        club_registry::delete(&state.db, &owner, id).await.or_redirect(CLUBS_PAGE)?;
    }
    Ok(redirect_with(CookieJar::new(), Flash::success("Group deleted successfully!"), CLUBS_PAGE))
}
