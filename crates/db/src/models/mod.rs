//! Row models and DTOs.

pub mod view_category;
pub mod view_category_view;
