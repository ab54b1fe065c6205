use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};

pub const SLOT_TAKEN: &str = "time slot already booked";
pub const NAME_TAKEN: &str = "an event with this name is already booked";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    pub event_name: String,
    pub event_date: String,
    pub event_time: String,
    pub duration: i32,
    pub participants: i32,
    pub booked_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Mutable fields of a booking. Date and time are opaque strings compared
/// lexicographically, e.g. `2024-05-01` and `10:00`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingFields {
    pub event_name: String,
    pub event_date: String,
    pub event_time: String,
    pub duration: i32,
    pub participants: i32,
}

impl BookingFields {
    pub fn new(event_name: &str, event_date: &str, event_time: &str) -> Self {
        Self {
            event_name: event_name.to_string(),
            event_date: event_date.to_string(),
            event_time: event_time.to_string(),
            duration: 1,
            participants: 1,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        errors::required("event_name", &self.event_name)?;
        errors::required("event_date", &self.event_date)?;
        errors::required("event_time", &self.event_time)?;
        if self.duration < 1 {
            return Err(ModelError::Validation("duration must be at least 1".into()));
        }
        if self.participants < 1 {
            return Err(ModelError::Validation("participants must be at least 1".into()));
        }
        Ok(())
    }
}

/// Name the violated constraint from the store's message. SQLite lists the
/// columns, Postgres names the index.
fn describe_conflict(raw: &str) -> &'static str {
    if raw.contains("owner_slot") || raw.contains("event_date") {
        SLOT_TAKEN
    } else {
        NAME_TAKEN
    }
}

fn translate(e: DbErr) -> ModelError {
    match ModelError::from(e) {
        ModelError::Conflict(raw) => ModelError::Conflict(describe_conflict(&raw).to_string()),
        other => other,
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, owner: &str, fields: &BookingFields) -> Result<Model, ModelError> {
    fields.validate()?;
    let am = ActiveModel {
        id: NotSet,
        username: Set(owner.to_string()),
        event_name: Set(fields.event_name.trim().to_string()),
        event_date: Set(fields.event_date.trim().to_string()),
        event_time: Set(fields.event_time.trim().to_string()),
        duration: Set(fields.duration),
        participants: Set(fields.participants),
        booked_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(translate)
}

/// Replace every mutable field of `existing`; owner and `booked_at` are kept.
pub async fn overwrite<C: ConnectionTrait>(db: &C, existing: Model, fields: &BookingFields) -> Result<Model, ModelError> {
    fields.validate()?;
    let mut am: ActiveModel = existing.into();
    am.event_name = Set(fields.event_name.trim().to_string());
    am.event_date = Set(fields.event_date.trim().to_string());
    am.event_time = Set(fields.event_time.trim().to_string());
    am.duration = Set(fields.duration);
    am.participants = Set(fields.participants);
    am.update(db).await.map_err(translate)
}
