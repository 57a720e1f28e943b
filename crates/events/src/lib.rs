//! Change-event infrastructure for view categorization.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ChangeEvent`] -- the team-addressed event envelope.
//! - [`ChangeNotifier`] -- typed, fire-and-forget publishing used by the
//!   service layer after each committed mutation.

pub mod bus;
pub mod notifier;

pub use bus::{ChangeEvent, ChangePayload, EventBus};
pub use notifier::ChangeNotifier;
