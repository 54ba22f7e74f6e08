//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    pub username_lower: String,

    /// Access token for bearer authentication
    #[sea_orm(unique, nullable)]
    pub token: Option<String>,

    /// Display name
    #[sea_orm(nullable)]
    pub display_name: Option<String>,

    /// Cached count of favorites owned by this user.
    /// NULL means stale; recomputed lazily on the next read.
    #[sea_orm(nullable)]
    pub favorites_count: Option<i32>,

    /// Whether the one-time legacy bookmark import has run for this user.
    #[sea_orm(default_value = false)]
    pub legacy_imported: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::favorite::Entity")]
    Favorites,

    #[sea_orm(has_many = "super::favorite_list::Entity")]
    FavoriteLists,
}

impl Related<super::favorite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorites.def()
    }
}

impl Related<super::favorite_list::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FavoriteLists.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
