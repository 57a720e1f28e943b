//! Change-event delivery.
//!
//! The [`ChangeBroadcaster`] subscribes to the event bus and forwards each
//! categorization change to the WebSocket clients of the affected team.

pub mod broadcaster;

pub use broadcaster::ChangeBroadcaster;
