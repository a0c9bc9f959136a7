use std::time::Duration;

use strum_macros::Display;

use crate::config::ReconnectPolicy;

use super::messages::LinkId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    Retry { attempt: u32, delay: Duration },
    GiveUp,
}

/// Stream lifecycle bookkeeping. Pure state: the engine does the I/O and
/// the scheduling, this decides what happens next.
#[derive(Debug)]
pub struct ConnectionManager {
    state: ConnectionState,
    attempts: u32,
    policy: ReconnectPolicy,
    current: Option<LinkId>,
    next_link: u64,
    exhausted: bool,
}

impl ConnectionManager {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            attempts: 0,
            policy,
            current: None,
            next_link: 0,
            exhausted: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn policy(&self) -> ReconnectPolicy {
        self.policy
    }

    pub fn current_link(&self) -> Option<LinkId> {
        self.current
    }

    pub fn is_current(&self, link: LinkId) -> bool {
        self.current == Some(link)
    }

    /// True once the retry budget is spent and only a manual reconnect helps.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn allocate(&mut self) -> LinkId {
        self.next_link += 1;
        let link = LinkId(self.next_link);
        self.current = Some(link);
        self.state = ConnectionState::Connecting;
        link
    }

    /// New link id, or `None` while a link is already connecting or open.
    pub fn begin_connect(&mut self) -> Option<LinkId> {
        match self.state {
            ConnectionState::Connecting | ConnectionState::Connected => None,
            ConnectionState::Disconnected => Some(self.allocate()),
        }
    }

    /// Abandon the live link (if any) and start over with a full retry budget.
    /// Returns the abandoned link and the new one.
    pub fn restart(&mut self) -> (Option<LinkId>, LinkId) {
        let old = self.current.take();
        self.attempts = 0;
        self.exhausted = false;
        self.state = ConnectionState::Disconnected;
        (old, self.allocate())
    }

    /// Returns false for a stale link.
    pub fn on_open(&mut self, link: LinkId) -> bool {
        if !self.is_current(link) || self.state != ConnectionState::Connecting {
            return false;
        }
        self.state = ConnectionState::Connected;
        self.attempts = 0;
        self.exhausted = false;
        true
    }

    /// `None` for a stale link, otherwise what to do about the drop.
    pub fn on_closed(&mut self, link: LinkId) -> Option<ReconnectDecision> {
        if !self.is_current(link) {
            return None;
        }
        self.current = None;
        self.state = ConnectionState::Disconnected;
        Some(self.next_attempt())
    }

    fn next_attempt(&mut self) -> ReconnectDecision {
        if self.attempts >= self.policy.max_attempts {
            self.exhausted = true;
            return ReconnectDecision::GiveUp;
        }
        self.attempts += 1;
        ReconnectDecision::Retry {
            attempt: self.attempts,
            delay: self.policy.delay_for(self.attempts),
        }
    }

    /// Forget the live link for good. Returns it so the caller can close it.
    pub fn shutdown(&mut self) -> Option<LinkId> {
        self.state = ConnectionState::Disconnected;
        self.current.take()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new(ReconnectPolicy::default())
    }
}
