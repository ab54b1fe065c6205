//! Create `event_bookings` table.
//! Two composite unique indexes: one event name per owner, and one booking
//! per owner per (date, time) slot.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventBookings::Table)
                    .if_not_exists()
                    .col(pk_auto(EventBookings::Id))
                    .col(string_len(EventBookings::Username, 64).not_null())
                    .col(string_len(EventBookings::EventName, 128).not_null())
                    .col(string_len(EventBookings::EventDate, 32).not_null().default(""))
                    .col(string_len(EventBookings::EventTime, 32).not_null().default(""))
                    .col(integer(EventBookings::Duration).not_null().default(1))
                    .col(integer(EventBookings::Participants).not_null().default(1))
                    .col(timestamp_with_time_zone(EventBookings::BookedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_event_bookings_owner_name")
                    .table(EventBookings::Table)
                    .col(EventBookings::Username)
                    .col(EventBookings::EventName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_event_bookings_owner_slot")
                    .table(EventBookings::Table)
                    .col(EventBookings::Username)
                    .col(EventBookings::EventDate)
                    .col(EventBookings::EventTime)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(EventBookings::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum EventBookings {
    Table,
    Id,
    Username,
    EventName,
    EventDate,
    EventTime,
    Duration,
    Participants,
    BookedAt,
}
