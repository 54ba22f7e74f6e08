//! Database repositories.

mod favorite;
mod favorite_list;
mod legacy_bookmark;
mod notice;
mod target;
mod user;

pub use favorite::{DEFAULT_TARGET_KIND, FavoriteFilter, FavoritePage, FavoriteRepository};
pub use favorite_list::FavoriteListRepository;
pub use legacy_bookmark::LegacyBookmarkRepository;
pub use notice::NoticeRepository;
pub use target::TargetRepository;
pub use user::UserRepository;
