use sea_orm::{entity::prelude::*, ConnectionTrait, NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: Option<String>,
    #[sea_orm(column_name = "password")]
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_username(username: &str) -> Result<(), ModelError> {
    errors::required("username", username)
}

/// Trim an optional email; blank becomes `None`.
pub fn normalize_email(email: Option<&str>) -> Option<String> {
    errors::blank_to_none(email)
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    username: &str,
    email: Option<&str>,
    password_hash: &str,
) -> Result<Model, ModelError> {
    validate_username(username)?;
    if password_hash.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    let am = ActiveModel {
        id: NotSet,
        username: Set(username.trim().to_string()),
        email: Set(normalize_email(email)),
        password_hash: Set(password_hash.to_string()),
    };
    am.insert(db).await.map_err(|e| match ModelError::from(e) {
        ModelError::Conflict(_) => ModelError::Conflict("username or email already exists".into()),
        other => other,
    })
}

pub async fn find_by_username<C: ConnectionTrait>(db: &C, username: &str) -> Result<Option<Model>, ModelError> {
    let found = Entity::find().filter(Column::Username.eq(username)).one(db).await?;
    Ok(found)
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, ModelError> {
    let found = Entity::find().filter(Column::Email.eq(email)).one(db).await?;
    Ok(found)
}
