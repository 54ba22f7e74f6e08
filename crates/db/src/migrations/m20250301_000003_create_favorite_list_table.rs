//! Create favorite_list table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FavoriteList::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FavoriteList::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FavoriteList::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(FavoriteList::Name).string_len(128).not_null())
                    .col(
                        ColumnDef::new(FavoriteList::Slug)
                            .string_len(256)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(FavoriteList::Description).text())
                    .col(
                        ColumnDef::new(FavoriteList::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(FavoriteList::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_list_user")
                            .from(FavoriteList::Table, FavoriteList::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for listing a user's lists)
        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_list_user_id")
                    .table(FavoriteList::Table)
                    .col(FavoriteList::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FavoriteList::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FavoriteList {
    Table,
    Id,
    UserId,
    Name,
    Slug,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
