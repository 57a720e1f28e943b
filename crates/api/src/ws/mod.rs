//! WebSocket fan-out of categorization changes.
//!
//! Provides connection management with per-team subscriptions, heartbeat
//! pings, and the HTTP upgrade handler used by the `/ws` route.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
