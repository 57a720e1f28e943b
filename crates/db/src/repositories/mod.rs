//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod board_repo;
pub mod view_category_repo;
pub mod view_category_view_repo;

pub use board_repo::{BoardRepo, PgBoardAccess};
pub use view_category_repo::ViewCategoryRepo;
pub use view_category_view_repo::ViewCategoryViewRepo;
