//! Migrator registering the clubhub schema in dependency order.
pub use sea_orm_migration::prelude::*;

mod m20240501_000001_create_users;
mod m20240501_000002_create_club_members;
mod m20240501_000003_create_event_bookings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240501_000001_create_users::Migration),
            Box::new(m20240501_000002_create_club_members::Migration),
            Box::new(m20240501_000003_create_event_bookings::Migration),
        ]
    }
}
