//! Legacy bookmark entity - rows imported once per user.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A bookmark row from the predecessor system. Read-only: the import
/// never mutates this table, it only mirrors rows into favorites.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "legacy_bookmark")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// User who owned the bookmark.
    pub user_id: String,

    /// Bookmarked target.
    pub target_id: String,

    /// Bookmark note, carried over into the favorite.
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
