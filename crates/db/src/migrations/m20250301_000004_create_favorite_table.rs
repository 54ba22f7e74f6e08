//! Create favorite table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Favorite::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Favorite::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Favorite::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Favorite::TargetId).string_len(32).not_null())
                    .col(ColumnDef::new(Favorite::TargetKind).string_len(32))
                    .col(ColumnDef::new(Favorite::Note).text())
                    .col(ColumnDef::new(Favorite::ListId).string_len(32))
                    .col(
                        ColumnDef::new(Favorite::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Favorite::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_user")
                            .from(Favorite::Table, Favorite::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_list")
                            .from(Favorite::Table, Favorite::ListId)
                            .to(FavoriteList::Table, FavoriteList::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for listing a user's favorites)
        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_user_id")
                    .table(Favorite::Table)
                    .col(Favorite::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, target_id) - duplicate-create existence check
        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_user_target")
                    .table(Favorite::Table)
                    .col(Favorite::UserId)
                    .col(Favorite::TargetId)
                    .to_owned(),
            )
            .await?;

        // Index: target_id (for per-target counts)
        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_target_id")
                    .table(Favorite::Table)
                    .col(Favorite::TargetId)
                    .to_owned(),
            )
            .await?;

        // Index: list_id (for list-filtered queries)
        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_list_id")
                    .table(Favorite::Table)
                    .col(Favorite::ListId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Favorite::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Favorite {
    Table,
    Id,
    UserId,
    TargetId,
    TargetKind,
    Note,
    ListId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum FavoriteList {
    Table,
    Id,
}
