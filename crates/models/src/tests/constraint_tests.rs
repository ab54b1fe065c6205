use anyhow::Result;
use sea_orm::EntityTrait;

use super::setup_test_db;
use crate::errors::ModelError;
use crate::event_booking::{self, BookingFields, NAME_TAKEN, SLOT_TAKEN};
use crate::user;

#[tokio::test]
async fn test_duplicate_username_is_conflict() -> Result<()> {
    let db = setup_test_db().await?;
    user::create(&db, "alice", None, "h1").await?;
    let dup = user::create(&db, "alice", None, "h2").await;
    assert!(matches!(dup, Err(ModelError::Conflict(_))));
    Ok(())
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() -> Result<()> {
    let db = setup_test_db().await?;
    user::create(&db, "alice", Some("a@example.com"), "h1").await?;
    let dup = user::create(&db, "bob", Some("a@example.com"), "h2").await;
    assert!(matches!(dup, Err(ModelError::Conflict(_))));
    Ok(())
}

#[tokio::test]
async fn test_same_event_name_per_owner_is_conflict() -> Result<()> {
    let db = setup_test_db().await?;
    event_booking::create(&db, "alice", &BookingFields::new("Meetup", "2024-05-01", "10:00")).await?;

    let dup = event_booking::create(&db, "alice", &BookingFields::new("Meetup", "2024-06-01", "10:00")).await;
    match dup {
        Err(ModelError::Conflict(msg)) => assert_eq!(msg, NAME_TAKEN),
        other => panic!("expected conflict, got {other:?}"),
    }

    // another owner may reuse the name
    event_booking::create(&db, "bob", &BookingFields::new("Meetup", "2024-05-01", "10:00")).await?;
    Ok(())
}

#[tokio::test]
async fn test_slot_index_rejects_double_booking() -> Result<()> {
    let db = setup_test_db().await?;
    event_booking::create(&db, "alice", &BookingFields::new("Meetup", "2024-05-01", "10:00")).await?;

    let dup = event_booking::create(&db, "alice", &BookingFields::new("Standup", "2024-05-01", "10:00")).await;
    match dup {
        Err(ModelError::Conflict(msg)) => assert_eq!(msg, SLOT_TAKEN),
        other => panic!("expected conflict, got {other:?}"),
    }

    let rows = event_booking::Entity::find().all(&db).await?;
    assert_eq!(rows.len(), 1);
    Ok(())
}
