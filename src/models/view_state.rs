use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use strum_macros::Display;

use crate::{
    domain::{AnalysisReport, Mode, Signal, Stats},
    engine::ConnectionState,
};

use super::{
    feed::SignalFeed,
    notifications::{NotificationId, NotificationQueue, Severity},
};

/// Which part of the view changed. Drained by whoever renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ViewChange {
    Connection,
    Retry,
    Bot,
    Mode,
    Stats,
    Uptime,
    Feed,
    Notifications,
    Analysis,
}

/// A scheduled automatic reconnect, for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRetry {
    pub attempt: u32,
    pub max_attempts: u32,
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotControls {
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

/// Everything the dashboard shows. Only the engine mutates it.
#[derive(Debug, Default)]
pub struct ViewStore {
    connection: ConnectionState,
    retry: Option<PendingRetry>,
    reconnect_exhausted: bool,
    bot_running: bool,
    mode: Option<Mode>,
    stats: Stats,
    uptime: Option<Duration>,
    feed: SignalFeed,
    signals_received: u64,
    notifications: NotificationQueue,
    analysis: Option<AnalysisReport>,
    revision: u64,
    changes: Vec<ViewChange>,
}

impl ViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Reads ---

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// "connected" / "connecting" / "disconnected"
    pub fn status_text(&self) -> String {
        self.connection.to_string()
    }

    pub fn pending_retry(&self) -> Option<PendingRetry> {
        self.retry
    }

    pub fn reconnect_exhausted(&self) -> bool {
        self.reconnect_exhausted
    }

    pub fn bot_running(&self) -> bool {
        self.bot_running
    }

    /// Exactly one of start/stop is enabled at any time.
    pub fn bot_controls(&self) -> BotControls {
        BotControls {
            start_enabled: !self.bot_running,
            stop_enabled: self.bot_running,
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Only the active mode's details panel is shown.
    pub fn mode_details_visible(&self, mode: Mode) -> bool {
        self.mode == Some(mode)
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn uptime(&self) -> Option<Duration> {
        self.uptime
    }

    pub fn feed(&self) -> &SignalFeed {
        &self.feed
    }

    /// Live `new_signal` pushes seen this session (snapshots excluded).
    pub fn signals_received(&self) -> u64 {
        self.signals_received
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn analysis(&self) -> Option<&AnalysisReport> {
        self.analysis.as_ref()
    }

    /// Bumped on every change. Cheap "anything new?" check for renderers.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn drain_changes(&mut self) -> Vec<ViewChange> {
        std::mem::take(&mut self.changes)
    }

    // --- Writes (engine only) ---

    fn mark(&mut self, change: ViewChange) {
        self.revision += 1;
        if !self.changes.contains(&change) {
            self.changes.push(change);
        }
    }

    pub(crate) fn set_connection(&mut self, state: ConnectionState) {
        if self.connection != state {
            self.connection = state;
            self.mark(ViewChange::Connection);
        }
    }

    pub(crate) fn set_retry(&mut self, retry: Option<PendingRetry>) {
        if self.retry != retry {
            self.retry = retry;
            self.mark(ViewChange::Retry);
        }
    }

    pub(crate) fn set_reconnect_exhausted(&mut self, exhausted: bool) {
        if self.reconnect_exhausted != exhausted {
            self.reconnect_exhausted = exhausted;
            self.mark(ViewChange::Retry);
        }
    }

    pub(crate) fn set_bot_running(&mut self, running: bool) {
        if self.bot_running != running {
            self.bot_running = running;
            self.mark(ViewChange::Bot);
        }
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        if self.mode != Some(mode) {
            self.mode = Some(mode);
            self.mark(ViewChange::Mode);
        }
    }

    /// Stats are replaced wholesale; uptime follows immediately.
    pub(crate) fn replace_stats(&mut self, stats: Stats, wall: DateTime<Utc>) {
        self.stats = stats;
        self.mark(ViewChange::Stats);
        self.refresh_uptime(wall);
    }

    pub(crate) fn refresh_uptime(&mut self, wall: DateTime<Utc>) {
        let uptime = self.stats.uptime_at(wall);
        if self.uptime != uptime {
            self.uptime = uptime;
            self.mark(ViewChange::Uptime);
        }
    }

    pub(crate) fn push_signal(&mut self, signal: Signal) {
        self.feed.insert_head(signal);
        self.signals_received += 1;
        self.mark(ViewChange::Feed);
    }

    pub(crate) fn replace_feed(&mut self, feed: SignalFeed) {
        self.feed = feed;
        self.mark(ViewChange::Feed);
    }

    pub(crate) fn notify(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        now: Instant,
    ) -> NotificationId {
        let id = self.notifications.push(message, severity, now);
        self.mark(ViewChange::Notifications);
        id
    }

    pub(crate) fn dismiss_notification(&mut self, id: NotificationId) -> bool {
        let removed = self.notifications.remove(id).is_some();
        if removed {
            self.mark(ViewChange::Notifications);
        }
        removed
    }

    pub(crate) fn set_analysis(&mut self, report: AnalysisReport) {
        self.analysis = Some(report);
        self.mark(ViewChange::Analysis);
    }
}
