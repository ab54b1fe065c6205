use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "club_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    pub club: String,
    pub members: i32,
    pub group_name: String,
    pub reason: Option<String>,
    pub joined_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Mutable fields of a membership, as submitted by its owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipFields {
    pub club: String,
    pub members: i32,
    pub group_name: String,
    pub reason: Option<String>,
}

impl MembershipFields {
    pub fn validate(&self) -> Result<(), ModelError> {
        errors::required("club", &self.club)?;
        errors::required("group_name", &self.group_name)?;
        if self.members < 0 {
            return Err(ModelError::Validation("members must not be negative".into()));
        }
        Ok(())
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, owner: &str, fields: &MembershipFields) -> Result<Model, ModelError> {
    fields.validate()?;
    let am = ActiveModel {
        id: NotSet,
        username: Set(owner.to_string()),
        club: Set(fields.club.trim().to_string()),
        members: Set(fields.members),
        group_name: Set(fields.group_name.trim().to_string()),
        reason: Set(errors::blank_to_none(fields.reason.as_deref())),
        joined_at: Set(Utc::now().into()),
    };
    let created = am.insert(db).await?;
    Ok(created)
}

/// Replace every mutable field of `existing`; owner and `joined_at` are kept.
pub async fn overwrite<C: ConnectionTrait>(db: &C, existing: Model, fields: &MembershipFields) -> Result<Model, ModelError> {
    fields.validate()?;
    let mut am: ActiveModel = existing.into();
    am.club = Set(fields.club.trim().to_string());
    am.members = Set(fields.members);
    am.group_name = Set(fields.group_name.trim().to_string());
    am.reason = Set(errors::blank_to_none(fields.reason.as_deref()));
    let updated = am.update(db).await?;
    Ok(updated)
}
