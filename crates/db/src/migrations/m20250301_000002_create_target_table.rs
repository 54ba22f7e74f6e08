//! Create target table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Target::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Target::Id).string_len(32).not_null().primary_key())
                    .col(
                        ColumnDef::new(Target::Kind)
                            .string_len(32)
                            .not_null()
                            .default("post"),
                    )
                    .col(ColumnDef::new(Target::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Target::Slug).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Target::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Target::FavoritesCount).integer())
                    .col(
                        ColumnDef::new(Target::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Target::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: kind (for per-kind listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_target_kind")
                    .table(Target::Table)
                    .col(Target::Kind)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Target::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Target {
    Table,
    Id,
    Kind,
    Title,
    Slug,
    IsPublished,
    FavoritesCount,
    CreatedAt,
    UpdatedAt,
}
