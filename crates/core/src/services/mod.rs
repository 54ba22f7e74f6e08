//! Business logic services.

pub mod capability;
pub mod favorite;
pub mod favorite_list;
pub mod favorite_target;
pub mod legacy_import;
pub mod notice;
pub mod user;

pub use capability::{Capability, CapabilityService};
pub use favorite::{
    FavoriteService, FavoriteUpdateInput, FavoriteUpdateOutcome, ListAssignment, ListSelector,
};
pub use favorite_list::FavoriteListService;
pub use favorite_target::FavoriteTargetService;
pub use legacy_import::{
    DbLegacyBookmarkSource, LegacyBookmark, LegacyBookmarkSource, LegacyImportService,
    NoOpLegacyBookmarkSource,
};
pub use notice::{NoticeService, ucfirst};
pub use user::UserService;
