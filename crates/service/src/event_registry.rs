//! Event bookings, scoped to the owning username, with the double-booking guard.

use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{info, instrument, warn};

use models::event_booking::{self, BookingFields, Entity as EventBookingEntity, SLOT_TAKEN};
use crate::errors::ServiceError;

/// Booking of `owner` occupying (`date`, `time`), if any.
pub async fn find_slot<C: ConnectionTrait>(db: &C, owner: &str, date: &str, time: &str) -> Result<Option<event_booking::Model>, ServiceError> {
    let found = EventBookingEntity::find()
        .filter(event_booking::Column::Username.eq(owner))
        .filter(event_booking::Column::EventDate.eq(date.trim()))
        .filter(event_booking::Column::EventTime.eq(time.trim()))
        .one(db)
        .await?;
    Ok(found)
}

/// Book an event for `owner`.
///
/// The slot lookup answers the common case; two requests racing past it are
/// settled by the store's unique (owner, date, time) index, whose violation is
/// reported as the same slot conflict. A name already used by the same owner
/// is rejected by the store.
#[instrument(skip(db, fields), fields(owner = %owner, event = %fields.event_name, date = %fields.event_date, time = %fields.event_time))]
pub async fn create(db: &DatabaseConnection, owner: &str, fields: &BookingFields) -> Result<event_booking::Model, ServiceError> {
    fields.validate()?;
    if let Some(clash) = find_slot(db, owner, &fields.event_date, &fields.event_time).await? {
        warn!(existing = clash.id, "slot_conflict");
        return Err(ServiceError::Conflict(SLOT_TAKEN.into()));
    }
    let created = event_booking::create(db, owner, fields).await?;
    info!(id = created.id, "event_booked");
    Ok(created)
}

/// Bookings of `owner` ordered by date then time, compared as stored strings.
pub async fn list(db: &DatabaseConnection, owner: &str) -> Result<Vec<event_booking::Model>, ServiceError> {
    let rows = EventBookingEntity::find()
        .filter(event_booking::Column::Username.eq(owner))
        .order_by_asc(event_booking::Column::EventDate)
        .order_by_asc(event_booking::Column::EventTime)
        .order_by_asc(event_booking::Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

/// Booking `id` if it belongs to `owner`.
pub async fn get(db: &DatabaseConnection, owner: &str, id: i32) -> Result<Option<event_booking::Model>, ServiceError> {
    let found = EventBookingEntity::find_by_id(id)
        .filter(event_booking::Column::Username.eq(owner))
        .one(db)
        .await?;
    Ok(found)
}

/// Overwrite all mutable fields of an owned booking.
///
/// No explicit slot lookup runs here; moving onto an occupied slot is still
/// refused by the store's unique index and reported as a conflict.
#[instrument(skip(db, fields), fields(owner = %owner, id))]
pub async fn update(db: &DatabaseConnection, owner: &str, id: i32, fields: &BookingFields) -> Result<event_booking::Model, ServiceError> {
    let Some(existing) = get(db, owner, id).await? else { return Err(ServiceError::not_found("event")); };
    let updated = event_booking::overwrite(db, existing, fields).await?;
    info!(date = %updated.event_date, time = %updated.event_time, "event_updated");
    Ok(updated)
}

/// Delete booking `id` if `owner` holds it; returns whether a row went away.
#[instrument(skip(db), fields(owner = %owner, id))]
pub async fn delete(db: &DatabaseConnection, owner: &str, id: i32) -> Result<bool, ServiceError> {
    let res = EventBookingEntity::delete_many()
        .filter(event_booking::Column::Id.eq(id))
        .filter(event_booking::Column::Username.eq(owner))
        .exec(db)
        .await?;
    info!(rows = res.rows_affected, "event_deleted");
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::event_booking::NAME_TAKEN;
    use crate::test_support::{get_db, get_file_db};

    fn booking(name: &str, date: &str, time: &str, participants: i32) -> BookingFields {
        BookingFields { participants, ..BookingFields::new(name, date, time) }
    }

    #[tokio::test]
    async fn double_booking_rejected_and_only_first_kept() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create(&db, "alice", &booking("Meetup", "2024-05-01", "10:00", 5)).await?;

        let err = create(&db, "alice", &booking("Standup", "2024-05-01", "10:00", 2)).await.unwrap_err();
        match err {
            ServiceError::Conflict(msg) => assert_eq!(msg, SLOT_TAKEN),
            other => panic!("expected conflict, got {other:?}"),
        }

        let rows = list(&db, "alice").await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event_name, "Meetup");
        assert_eq!(rows[0].participants, 5);
        Ok(())
    }

    #[tokio::test]
    async fn same_slot_for_different_owners_is_fine() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create(&db, "alice", &booking("Meetup", "2024-05-01", "10:00", 1)).await?;
        create(&db, "bob", &booking("Meetup", "2024-05-01", "10:00", 1)).await?;
        assert_eq!(list(&db, "bob").await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_name_conflicts_via_store() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create(&db, "alice", &booking("Meetup", "2024-05-01", "10:00", 1)).await?;
        let err = create(&db, "alice", &booking("Meetup", "2024-05-02", "11:00", 1)).await.unwrap_err();
        match err {
            ServiceError::Conflict(msg) => assert_eq!(msg, NAME_TAKEN),
            other => panic!("expected conflict, got {other:?}"),
        }
        assert_eq!(list(&db, "alice").await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn list_orders_by_date_then_time() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create(&db, "alice", &booking("C", "2024-05-02", "09:00", 1)).await?;
        create(&db, "alice", &booking("B", "2024-05-01", "14:00", 1)).await?;
        create(&db, "alice", &booking("A", "2024-05-01", "08:30", 1)).await?;

        let names: Vec<String> = list(&db, "alice").await?.into_iter().map(|e| e.event_name).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        Ok(())
    }

    #[tokio::test]
    async fn update_overwrites_owned_booking() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let e = create(&db, "alice", &booking("Meetup", "2024-05-01", "10:00", 5)).await?;
        let moved = BookingFields { duration: 3, ..booking("Meetup v2", "2024-06-01", "12:00", 8) };
        let updated = update(&db, "alice", e.id, &moved).await?;
        assert_eq!(updated.event_name, "Meetup v2");
        assert_eq!(updated.event_date, "2024-06-01");
        assert_eq!(updated.duration, 3);
        assert_eq!(updated.participants, 8);
        Ok(())
    }

    #[tokio::test]
    async fn update_onto_occupied_slot_is_conflict() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create(&db, "alice", &booking("Meetup", "2024-05-01", "10:00", 1)).await?;
        let other = create(&db, "alice", &booking("Standup", "2024-05-01", "11:00", 1)).await?;

        let res = update(&db, "alice", other.id, &booking("Standup", "2024-05-01", "10:00", 1)).await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))));
        assert_eq!(get(&db, "alice", other.id).await?.unwrap().event_time, "11:00");
        Ok(())
    }

    #[tokio::test]
    async fn update_of_missing_id_is_not_found_without_mutation() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let e = create(&db, "alice", &booking("Meetup", "2024-05-01", "10:00", 1)).await?;
        let res = update(&db, "alice", e.id + 1, &booking("Other", "2024-07-01", "10:00", 1)).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        let rows = list(&db, "alice").await?;
        assert_eq!(rows, vec![e]);
        Ok(())
    }

    #[tokio::test]
    async fn foreign_delete_leaves_row() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let e = create(&db, "alice", &booking("Meetup", "2024-05-01", "10:00", 1)).await?;
        assert!(!delete(&db, "bob", e.id).await?);
        assert_eq!(list(&db, "alice").await?.len(), 1);
        assert!(delete(&db, "alice", e.id).await?);
        assert!(list(&db, "alice").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn invalid_fields_rejected_before_store() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let bad = BookingFields { participants: 0, ..BookingFields::new("Meetup", "2024-05-01", "10:00") };
        assert!(matches!(create(&db, "alice", &bad).await, Err(ServiceError::Validation(_))));
        assert!(list(&db, "alice").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn freed_slot_can_be_rebooked() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let e = create(&db, "alice", &booking("Meetup", "2024-05-01", "10:00", 1)).await?;
        delete(&db, "alice", e.id).await?;
        create(&db, "alice", &booking("Standup", "2024-05-01", "10:00", 1)).await?;
        assert!(find_slot(&db, "alice", "2024-05-01", "10:00").await?.is_some());
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_bookings_of_one_slot_all_resolve_as_conflicts() -> Result<(), anyhow::Error> {
        let (db, path) = get_file_db("slot_race").await?;

        let mut handles = Vec::new();
        for i in 0..16 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                create(&db, "alice", &BookingFields::new(&format!("E{}", i), "2024-05-01", "10:00")).await
            }));
        }

        let (mut booked, mut conflicts) = (0, 0);
        for h in handles {
            match h.await? {
                Ok(_) => booked += 1,
                Err(ServiceError::Conflict(msg)) => {
                    assert_eq!(msg, SLOT_TAKEN);
                    conflicts += 1;
                }
                Err(other) => panic!("expected conflict, got {other:?}"),
            }
        }
        assert_eq!((booked, conflicts), (1, 15));
        assert_eq!(list(&db, "alice").await?.len(), 1);

        db.close().await?;
        crate::test_support::remove_file_db(&path);
        Ok(())
    }
}
