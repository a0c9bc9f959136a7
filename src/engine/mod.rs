mod commands;
mod connection;
mod core;
mod messages;
mod router;
mod timers;

pub use {
    commands::{CommandGateway, normalize_symbol},
    connection::{ConnectionManager, ConnectionState, ReconnectDecision},
    core::LiveEngine,
    messages::{
        CommandBackend, CommandError, CommandOutcome, CommandReply, CommandRequest, CommandTicket,
        EngineEvent, EventSink, LinkCommand, LinkHandle, LinkId, StatsSync, StreamEvent, Transport,
    },
    timers::{TimerHandle, TimerKind, TimerSet},
};
