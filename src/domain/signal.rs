use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Side {
    Long,
    Short,
}

/// One trading recommendation as pushed by the backend. Never mutated after receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub symbol: String,
    pub side: Side,
    pub regime: String,
    pub entry: f64,
    pub sl: f64,
    pub tp1: f64,
    pub tp2: f64,
    pub tp3: f64,
    pub score: f64,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

/// Reward-to-risk against the first target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiskReward {
    Ratio(f64),
    /// Stop equals entry (or the inputs are not finite).
    NotComputable,
}

impl RiskReward {
    pub fn ratio(&self) -> Option<f64> {
        match self {
            RiskReward::Ratio(r) => Some(*r),
            RiskReward::NotComputable => None,
        }
    }
}

impl fmt::Display for RiskReward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskReward::Ratio(r) => write!(f, "1:{:.2}", r),
            RiskReward::NotComputable => write!(f, "n/a"),
        }
    }
}

impl Signal {
    pub fn risk_reward(&self) -> RiskReward {
        let (reward, risk) = match self.side {
            Side::Long => (self.tp1 - self.entry, self.entry - self.sl),
            Side::Short => (self.entry - self.tp1, self.sl - self.entry),
        };
        if risk == 0.0 {
            return RiskReward::NotComputable;
        }
        let ratio = reward / risk;
        if ratio.is_finite() {
            RiskReward::Ratio(ratio)
        } else {
            RiskReward::NotComputable
        }
    }

    /// "WIF-USDT LONG"
    pub fn headline(&self) -> String {
        format!("{} {}", self.symbol, self.side)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} @ {} (sl {}, tp1 {}, score {:.0}, rr {})",
            self.symbol,
            self.side,
            self.entry,
            self.sl,
            self.tp1,
            self.score,
            self.risk_reward()
        )
    }
}
