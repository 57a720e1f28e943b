//! Domain core for board view categorization.
//!
//! Holds everything that does not touch I/O: the gap-based ordering
//! reconciliation, category validation rules, the error taxonomy, and the
//! board-access collaborator trait implemented by the storage layer.

pub mod board_access;
pub mod error;
pub mod ordering;
pub mod types;
pub mod view_category;
