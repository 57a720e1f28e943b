//! Request handlers.
//!
//! Handlers are thin: they extract the caller, path and body, delegate to
//! [`CategorizationService`](crate::categorization::CategorizationService)
//! and wrap the result in a [`DataResponse`](crate::response::DataResponse).

pub mod view_categories;
