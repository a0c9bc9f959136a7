use std::time::Duration;

/// Linear backoff: attempt `n` waits `base_delay * n`, at most `max_attempts` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl ReconnectPolicy {
    /// Delay before attempt `attempt` (1-based).
    pub const fn delay_for(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.base_delay.as_millis() as u64 * attempt as u64)
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        BACKEND.stream.reconnect
    }
}

pub struct StreamConfig {
    pub path: &'static str,
    pub connect_timeout: Duration,
    pub reconnect: ReconnectPolicy,
    pub heartbeat_interval: Duration,
    pub heartbeat_payload: &'static str,
    pub heartbeat_reply: &'static str,
}

pub struct HttpConfig {
    pub request_timeout: Duration,
    pub bot_start_path: &'static str,
    pub bot_stop_path: &'static str,
    pub mode_path: &'static str,
    pub analysis_path: &'static str,
    pub stats_path: &'static str,
    pub user_agent: &'static str,
}

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

pub struct BackendConfig {
    pub stream: StreamConfig,
    pub http: HttpConfig,
}

pub const BACKEND: BackendConfig = BackendConfig {
    stream: StreamConfig {
        path: "/ws",
        connect_timeout: Duration::from_secs(10),
        reconnect: ReconnectPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(3000),
        },
        heartbeat_interval: Duration::from_secs(20), // backend drops sockets idle for 30s
        heartbeat_payload: "ping",
        heartbeat_reply: "pong",
    },
    http: HttpConfig {
        request_timeout: Duration::from_secs(10),
        bot_start_path: "/bot/start",
        bot_stop_path: "/bot/stop",
        mode_path: "/mode",
        analysis_path: "/analysis",
        stats_path: "/stats",
        user_agent: concat!("signal-desk/", env!("CARGO_PKG_VERSION")),
    },
};
