//! Create legacy_bookmark table migration.
//!
//! Deployments importing from a predecessor system load this table
//! before the first dashboard view; everyone else leaves it empty.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LegacyBookmark::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LegacyBookmark::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LegacyBookmark::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(LegacyBookmark::TargetId).string_len(32).not_null())
                    .col(ColumnDef::new(LegacyBookmark::Note).text())
                    .col(
                        ColumnDef::new(LegacyBookmark::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (import scans per user)
        manager
            .create_index(
                Index::create()
                    .name("idx_legacy_bookmark_user_id")
                    .table(LegacyBookmark::Table)
                    .col(LegacyBookmark::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LegacyBookmark::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LegacyBookmark {
    Table,
    Id,
    UserId,
    TargetId,
    Note,
    CreatedAt,
}
