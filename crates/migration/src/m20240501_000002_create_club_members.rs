//! Create `club_members` table.
//! Owner is referenced by username value, not by foreign key.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClubMembers::Table)
                    .if_not_exists()
                    .col(pk_auto(ClubMembers::Id))
                    .col(string_len(ClubMembers::Username, 64).not_null())
                    .col(string_len(ClubMembers::Club, 128).not_null())
                    .col(integer(ClubMembers::Members).not_null())
                    .col(string_len(ClubMembers::GroupName, 128).not_null())
                    .col(text_null(ClubMembers::Reason))
                    .col(timestamp_with_time_zone(ClubMembers::JoinedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_club_members_username")
                    .table(ClubMembers::Table)
                    .col(ClubMembers::Username)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ClubMembers::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ClubMembers {
    Table,
    Id,
    Username,
    Club,
    Members,
    GroupName,
    Reason,
    JoinedAt,
}
