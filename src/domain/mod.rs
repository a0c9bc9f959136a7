// Domain types and value objects
mod analysis;
mod mode;
mod signal;
mod stats;

pub use analysis::AnalysisReport;
pub use mode::Mode;
pub use signal::{RiskReward, Side, Signal};
pub use stats::Stats;

#[cfg(test)]
pub(crate) use signal::fixtures;
