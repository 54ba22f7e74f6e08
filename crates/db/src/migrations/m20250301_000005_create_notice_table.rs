//! Create notice table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notice::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notice::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Notice::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Notice::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(Notice::Message).text().not_null())
                    .col(
                        ColumnDef::new(Notice::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notice_user")
                            .from(Notice::Table, Notice::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for draining a user's queue)
        manager
            .create_index(
                Index::create()
                    .name("idx_notice_user_id")
                    .table(Notice::Table)
                    .col(Notice::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notice::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Notice {
    Table,
    Id,
    UserId,
    Kind,
    Message,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
