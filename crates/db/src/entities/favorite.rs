//! Favorite entity - a user's bookmark of a target.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single favorite: owner + target, with an optional note and list
/// assignment. At most one active favorite exists per (owner, target,
/// kind) tuple; the service layer enforces this on create.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "favorite")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// User who owns the favorite.
    pub user_id: String,

    /// Target that was favorited.
    pub target_id: String,

    /// Target kind. NULL means the default kind "post" — records created
    /// before multi-kind support carry no kind at all.
    #[sea_orm(nullable)]
    pub target_kind: Option<String>,

    /// Free-text note, sanitized rich text.
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,

    /// List this favorite is assigned to, if any.
    #[sea_orm(nullable)]
    pub list_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::target::Entity",
        from = "Column::TargetId",
        to = "super::target::Column::Id"
    )]
    Target,
    #[sea_orm(
        belongs_to = "super::favorite_list::Entity",
        from = "Column::ListId",
        to = "super::favorite_list::Column::Id"
    )]
    List,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::target::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Target.def()
    }
}

impl Related<super::favorite_list::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::List.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
