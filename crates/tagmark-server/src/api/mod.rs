//! HTTP API handlers for tagmark

pub mod bookmarks;
pub mod health;
pub mod upload;

pub use bookmarks::{
    add_bookmark, add_bookmarks_batch, delete_bookmark, list_bookmarks,
    list_bookmarks_by_category, list_bookmarks_by_tag, update_bookmark,
};
pub use health::health_routes;
pub use upload::upload_bookmark_file;
