use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};

/// Aggregate scanner statistics. Replaced wholesale on every update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub total_scans: u64,
    pub signals_sent: u64,
    pub last_scan_at: Option<NaiveDateTime>,
    /// When the bot loop was started; drives the uptime display.
    pub started_at: Option<DateTime<Utc>>,
}

impl Stats {
    pub fn uptime_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        let started = self.started_at?;
        // Clock skew between us and the backend can put start in the future.
        Some((now - started).to_std().unwrap_or(Duration::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_needs_a_start_time() {
        let now = DateTime::from_timestamp(1_000, 0).unwrap();
        assert_eq!(Stats::default().uptime_at(now), None);

        let stats = Stats {
            started_at: DateTime::from_timestamp(940, 0),
            ..Default::default()
        };
        assert_eq!(stats.uptime_at(now), Some(Duration::from_secs(60)));

        let skewed = Stats {
            started_at: DateTime::from_timestamp(2_000, 0),
            ..Default::default()
        };
        assert_eq!(skewed.uptime_at(now), Some(Duration::ZERO));
    }
}
