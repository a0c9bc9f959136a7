//! Configuration module for the dashboard client.

// Can all be private now because we have a public re-export.
mod backend;
mod debug;
mod notices;

// Public
pub mod constants;

// Re-export commonly used items
pub use backend::{
    BACKEND, BackendConfig, DEFAULT_SERVER_URL, HttpConfig, ReconnectPolicy, StreamConfig,
};
pub use constants::{FEED_CAPACITY, IDLE_REPAINT, NOTIFICATION_TTL, UPTIME_REFRESH};
pub use debug::DF;
pub use notices::NOTICES;
