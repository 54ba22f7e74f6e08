//! Target entity - a read-only projection of the favoritable content item.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A content item that can be favorited, identified by id and kind.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "target")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Content kind. Currently only "post" is favoritable.
    pub kind: String,

    pub title: String,

    /// URL path segment used to build the permalink.
    pub slug: String,

    /// Only published targets expose a permalink.
    #[sea_orm(default_value = false)]
    pub is_published: bool,

    /// Cached count of favorites referencing this target.
    /// NULL means stale; recomputed lazily on the next read.
    #[sea_orm(nullable)]
    pub favorites_count: Option<i32>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::favorite::Entity")]
    Favorites,
}

impl Related<super::favorite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorites.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
