//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Emit verbose logging for stream link lifecycle and raw frames.
    pub log_stream_frames: bool,

    /// Log every routed inbound message.
    pub log_router: bool,

    /// Log outbound control requests and their outcomes.
    pub log_commands: bool,

    /// Log timer scheduling / firing.
    pub log_timers: bool,

    pub log_notifications: bool,
}

pub const DF: LogFlags = LogFlags {
    log_stream_frames: false,
    log_router: true,
    log_commands: true,
    log_timers: false,
    log_notifications: false,
};
