mod feed;
mod notifications;
mod view_state;

pub use {
    feed::SignalFeed,
    notifications::{Notification, NotificationId, NotificationQueue, Severity},
    view_state::{BotControls, PendingRetry, ViewChange, ViewStore},
};
