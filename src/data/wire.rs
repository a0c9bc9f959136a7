//! JSON shapes exchanged with the signal backend.

use {
    chrono::{DateTime, Local, TimeZone, Utc},
    serde::{Deserialize, Serialize},
};

use crate::{
    config::BACKEND,
    domain::{AnalysisReport, Mode, Side, Signal, Stats},
    utils::{epoch_secs_to_utc, parse_backend_time},
};

/// One inbound stream frame, discriminated by its `type` field.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    InitialState(Snapshot),
    NewSignal {
        signal: SignalWire,
    },
    StatsUpdate {
        #[serde(default)]
        stats: StatsWire,
    },
    BotStatus(BotStatusWire),
    ModeChanged {
        mode: String,
    },
    /// Any tag we do not know (the backend's keep-alive `ping` included).
    #[serde(other)]
    Unknown,
}

impl InboundMessage {
    pub fn tag(&self) -> &'static str {
        match self {
            InboundMessage::InitialState(_) => "initial_state",
            InboundMessage::NewSignal { .. } => "new_signal",
            InboundMessage::StatsUpdate { .. } => "stats_update",
            InboundMessage::BotStatus(_) => "bot_status",
            InboundMessage::ModeChanged { .. } => "mode_changed",
            InboundMessage::Unknown => "unknown",
        }
    }
}

/// Parse a raw text frame. Errors mean the frame is dropped, never the link.
pub fn parse_frame(text: &str) -> Result<InboundMessage, serde_json::Error> {
    serde_json::from_str(text)
}

/// The backend answers our heartbeat with a bare, non-JSON text frame.
pub fn is_heartbeat_reply(text: &str) -> bool {
    text.trim() == BACKEND.stream.heartbeat_reply
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub is_running: bool,
    pub stats: StatsWire,
    pub current_mode: Option<String>,
    pub current_signals: Vec<SignalWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BotStatusWire {
    pub status: Option<String>,
    pub is_running: Option<bool>,
}

impl BotStatusWire {
    /// `None` when the payload names no status we recognise.
    pub fn running(&self) -> Option<bool> {
        if let Some(flag) = self.is_running {
            return Some(flag);
        }
        match self.status.as_deref()?.trim().to_ascii_lowercase().as_str() {
            "started" | "running" => Some(true),
            "stopped" => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct StatsWire {
    pub total_scans: Option<u64>,
    pub signals_sent: Option<u64>,
    pub last_scan: Option<String>,
    pub start_time: Option<f64>,
}

impl StatsWire {
    pub fn into_stats(self) -> Stats {
        Stats {
            total_scans: self.total_scans.unwrap_or(0),
            signals_sent: self.signals_sent.unwrap_or(0),
            last_scan_at: self.last_scan.as_deref().and_then(parse_backend_time),
            started_at: self.start_time.and_then(epoch_secs_to_utc),
        }
    }
}

/// `GET /stats`: stats plus bot state.
#[derive(Debug, Default, Deserialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: StatsWire,
    #[serde(default)]
    pub is_running: Option<bool>,
    #[serde(default)]
    pub current_mode: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireTimestamp {
    EpochSecs(f64),
    Text(String),
}

impl WireTimestamp {
    pub fn resolve(&self) -> Option<DateTime<Utc>> {
        match self {
            WireTimestamp::EpochSecs(secs) => epoch_secs_to_utc(*secs),
            WireTimestamp::Text(raw) => {
                if let Ok(dt) = DateTime::parse_from_rfc3339(raw.trim()) {
                    return Some(dt.with_timezone(&Utc));
                }
                let naive = parse_backend_time(raw)?;
                Local
                    .from_local_datetime(&naive)
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
            }
        }
    }
}

fn unknown_regime() -> String {
    "UNKNOWN".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignalWire {
    pub symbol: String,
    pub side: Side,
    #[serde(default = "unknown_regime")]
    pub regime: String,
    pub entry: f64,
    pub sl: f64,
    pub tp1: f64,
    pub tp2: f64,
    pub tp3: f64,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub timestamp: Option<WireTimestamp>,
}

impl SignalWire {
    /// Timestamp as declared by the backend, if present and parseable.
    pub fn declared_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_ref().and_then(WireTimestamp::resolve)
    }

    /// Missing timestamps fall back to `received_at`.
    pub fn into_signal(self, received_at: DateTime<Utc>) -> Signal {
        let timestamp = self.declared_timestamp().unwrap_or(received_at);
        Signal {
            symbol: self.symbol,
            side: self.side,
            regime: self.regime,
            entry: self.entry,
            sl: self.sl,
            tp1: self.tp1,
            tp2: self.tp2,
            tp3: self.tp3,
            score: self.score,
            reason: self.reason,
            timestamp,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisWire {
    pub symbol: String,
    pub price: Option<f64>,
    pub rsi: Option<f64>,
    pub adx: Option<f64>,
    pub atr_percent: Option<f64>,
    pub bandwidth: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub dc_low: Option<f64>,
    pub dc_high: Option<f64>,
    pub timestamp: Option<String>,
}

impl AnalysisWire {
    pub fn into_report(self) -> AnalysisReport {
        AnalysisReport {
            symbol: self.symbol,
            price: self.price,
            rsi: self.rsi,
            adx: self.adx,
            atr_percent: self.atr_percent,
            bandwidth: self.bandwidth,
            bb_upper: self.bb_upper,
            bb_lower: self.bb_lower,
            dc_low: self.dc_low,
            dc_high: self.dc_high,
            timestamp: self.timestamp.as_deref().and_then(parse_backend_time),
        }
    }
}

/// Error payload of a non-2xx control response. FastAPI puts either a string
/// or a list of validation errors under `detail`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Form body of `POST /mode`.
#[derive(Debug, Serialize)]
pub struct ModeForm {
    pub mode: Mode,
}

/// Success payload of a control response (`{"message": "..."}`).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AckBody {
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIF: &str = r#"{"type":"new_signal","signal":{"symbol":"WIF-USDT","side":"LONG","entry":2.3456,"sl":2.2984,"tp1":2.3928,"tp2":2.4212,"tp3":2.4496,"score":74,"regime":"SMC","reason":"CHOCH+FVG","timestamp":1714564800.5}}"#;

    #[test]
    fn new_signal_frame_parses() {
        let InboundMessage::NewSignal { signal } = parse_frame(WIF).unwrap() else {
            panic!("expected new_signal");
        };
        assert_eq!(signal.symbol, "WIF-USDT");
        assert_eq!(signal.side, Side::Long);
        assert_eq!(signal.score, 74.0);
        let ts = signal.declared_timestamp().unwrap();
        assert_eq!(ts.timestamp_millis(), 1_714_564_800_500);
    }

    #[test]
    fn signal_defaults_regime_and_timestamp() {
        let raw = r#"{"symbol":"X-USDT","side":"SHORT","entry":1,"sl":2,"tp1":0.5,"tp2":0.4,"tp3":0.3}"#;
        let wire: SignalWire = serde_json::from_str(raw).unwrap();
        assert_eq!(wire.regime, "UNKNOWN");
        assert!(wire.declared_timestamp().is_none());

        let received = DateTime::from_timestamp(42, 0).unwrap();
        let signal = wire.into_signal(received);
        assert_eq!(signal.timestamp, received);
        assert_eq!(signal.reason, "");
    }

    #[test]
    fn snapshot_tolerates_missing_fields() {
        let msg = parse_frame(r#"{"type":"initial_state"}"#).unwrap();
        let InboundMessage::InitialState(snap) = msg else {
            panic!("expected initial_state");
        };
        assert!(!snap.is_running);
        assert!(snap.current_signals.is_empty());
        assert_eq!(snap.stats.into_stats(), Stats::default());
    }

    #[test]
    fn stats_default_missing_numbers_to_zero() {
        let raw = r#"{"type":"stats_update","stats":{"total_scans":12,"signals_sent":null,"last_scan":"2024-05-01T10:00:00.123","start_time":1714550000.0}}"#;
        let InboundMessage::StatsUpdate { stats } = parse_frame(raw).unwrap() else {
            panic!("expected stats_update");
        };
        let stats = stats.into_stats();
        assert_eq!(stats.total_scans, 12);
        assert_eq!(stats.signals_sent, 0);
        assert!(stats.last_scan_at.is_some());
        assert!(stats.started_at.is_some());
    }

    #[test]
    fn bot_status_accepts_both_shapes() {
        let push: BotStatusWire = serde_json::from_str(r#"{"status":"started"}"#).unwrap();
        assert_eq!(push.running(), Some(true));
        let stop: BotStatusWire = serde_json::from_str(r#"{"status":"stopped"}"#).unwrap();
        assert_eq!(stop.running(), Some(false));
        let flag: BotStatusWire = serde_json::from_str(r#"{"is_running":true}"#).unwrap();
        assert_eq!(flag.running(), Some(true));
        let odd: BotStatusWire = serde_json::from_str(r#"{"status":"paused"}"#).unwrap();
        assert_eq!(odd.running(), None);
    }

    #[test]
    fn unknown_tags_parse_as_unknown() {
        assert!(matches!(
            parse_frame(r#"{"type":"ping"}"#).unwrap(),
            InboundMessage::Unknown
        ));
        assert!(matches!(
            parse_frame(r#"{"type":"portfolio","value":3}"#).unwrap(),
            InboundMessage::Unknown
        ));
    }

    #[test]
    fn garbage_frames_are_errors() {
        assert!(parse_frame("pong").is_err());
        assert!(parse_frame(r#"{"no_type":true}"#).is_err());
        assert!(parse_frame(r#"{"type":"new_signal","signal":{"symbol":"X"}}"#).is_err());
    }

    #[test]
    fn heartbeat_reply_is_recognised_before_parsing() {
        assert!(is_heartbeat_reply("pong"));
        assert!(is_heartbeat_reply(" pong\n"));
        assert!(!is_heartbeat_reply("ping"));
        assert!(!is_heartbeat_reply(r#"{"type":"pong"}"#));
        assert!(!is_heartbeat_reply("not json"));
    }

    #[test]
    fn error_detail_accepts_strings_and_lists() {
        let s: ErrorBody = serde_json::from_str(r#"{"detail":"Geçersiz mod: x"}"#).unwrap();
        assert_eq!(s.message().as_deref(), Some("Geçersiz mod: x"));
        let list: ErrorBody = serde_json::from_str(r#"{"detail":[{"msg":"field required"}]}"#).unwrap();
        assert!(list.message().unwrap().contains("field required"));
        let none: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(none.message(), None);
    }

    #[test]
    fn stats_response_flattens_stats() {
        let raw = r#"{"total_scans":3,"signals_sent":1,"last_scan":null,"start_time":null,"is_running":true,"current_mode":"balanced","signal_count":1}"#;
        let resp: StatsResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.is_running, Some(true));
        assert_eq!(resp.current_mode.as_deref(), Some("balanced"));
        assert_eq!(resp.stats.into_stats().total_scans, 3);
    }
}
