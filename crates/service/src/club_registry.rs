//! Club memberships, scoped to the owning username.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{info, instrument};

use models::club_membership::{self, Entity as ClubMembershipEntity, MembershipFields};
use crate::errors::ServiceError;

/// Record that `owner` joined a club. Memberships have no uniqueness rule.
#[instrument(skip(db, fields), fields(owner = %owner, club = %fields.club))]
pub async fn create(db: &DatabaseConnection, owner: &str, fields: &MembershipFields) -> Result<club_membership::Model, ServiceError> {
    let created = club_membership::create(db, owner, fields).await?;
    info!(id = created.id, "club_joined");
    Ok(created)
}

/// All memberships of `owner`, in insertion order.
pub async fn list(db: &DatabaseConnection, owner: &str) -> Result<Vec<club_membership::Model>, ServiceError> {
    let rows = ClubMembershipEntity::find()
        .filter(club_membership::Column::Username.eq(owner))
        .order_by_asc(club_membership::Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

/// Membership `id` if it belongs to `owner`.
pub async fn get(db: &DatabaseConnection, owner: &str, id: i32) -> Result<Option<club_membership::Model>, ServiceError> {
    let found = ClubMembershipEntity::find_by_id(id)
        .filter(club_membership::Column::Username.eq(owner))
        .one(db)
        .await?;
    Ok(found)
}

/// Overwrite all mutable fields; `NotFound` when the row is absent or owned by someone else.
#[instrument(skip(db, fields), fields(owner = %owner, id))]
pub async fn update(db: &DatabaseConnection, owner: &str, id: i32, fields: &MembershipFields) -> Result<club_membership::Model, ServiceError> {
    let Some(existing) = get(db, owner, id).await? else { return Err(ServiceError::not_found("group")); };
    let updated = club_membership::overwrite(db, existing, fields).await?;
    info!(members = updated.members, "club_updated");
    Ok(updated)
}

/// Delete membership `id` if `owner` holds it; returns whether a row went away.
#[instrument(skip(db), fields(owner = %owner, id))]
pub async fn delete(db: &DatabaseConnection, owner: &str, id: i32) -> Result<bool, ServiceError> {
    let res = ClubMembershipEntity::delete_many()
        .filter(club_membership::Column::Id.eq(id))
        .filter(club_membership::Column::Username.eq(owner))
        .exec(db)
        .await?;
    info!(rows = res.rows_affected, "club_deleted");
    Ok(res.rows_affected > 0)
}
