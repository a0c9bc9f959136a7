use std::time::Duration;

/// Max signals held in the feed. Oldest is evicted on overflow.
pub const FEED_CAPACITY: usize = 20;

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// Period of the uptime recompute timer.
pub const UPTIME_REFRESH: Duration = Duration::from_secs(10);

/// Upper bound on how long the UI sleeps between repaints while idle.
pub const IDLE_REPAINT: Duration = Duration::from_millis(500);

pub mod modes {
    use crate::domain::Mode;

    /// Display-only summary of the backend's per-mode scan parameters.
    pub struct ModeDetail {
        pub mode: Mode,
        pub min_score: u32,
        pub cooldown_min: u32,
        pub min_volume_usdt: u64,
        pub top_n_per_scan: u32,
        pub blurb: &'static str,
    }

    pub const DETAILS: &[ModeDetail] = &[
        ModeDetail {
            mode: Mode::Aggressive,
            min_score: 52,
            cooldown_min: 15,
            min_volume_usdt: 700_000,
            top_n_per_scan: 5,
            blurb: "Daha fazla sinyal, daha düşük eşik",
        },
        ModeDetail {
            mode: Mode::Balanced,
            min_score: 68,
            cooldown_min: 30,
            min_volume_usdt: 2_000_000,
            top_n_per_scan: 2,
            blurb: "Dengeli filtreler, FVG zorunlu",
        },
        ModeDetail {
            mode: Mode::Conservative,
            min_score: 72,
            cooldown_min: 40,
            min_volume_usdt: 3_000_000,
            top_n_per_scan: 2,
            blurb: "Az ama seçici sinyal",
        },
    ];

    pub fn detail(mode: Mode) -> Option<&'static ModeDetail> {
        DETAILS.iter().find(|d| d.mode == mode)
    }
}
