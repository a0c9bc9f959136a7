use std::sync::{Arc, mpsc::Sender};

use thiserror::Error;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::domain::{AnalysisReport, Mode, Stats};

/// Generation number of one stream connection. A fresh id per `open`,
/// so late events from a torn-down link can be told apart and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandTicket(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Opened,
    Frame(String),
    Closed { reason: String },
}

/// Everything the I/O side reports back to the engine.
#[derive(Debug)]
pub enum EngineEvent {
    Stream { link: LinkId, event: StreamEvent },
    Command(CommandOutcome),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandRequest {
    StartBot,
    StopBot,
    ChangeMode(Mode),
    AnalyzeSymbol(String),
    RefreshStats,
}

impl CommandRequest {
    pub fn label(&self) -> String {
        match self {
            CommandRequest::StartBot => "start bot".to_string(),
            CommandRequest::StopBot => "stop bot".to_string(),
            CommandRequest::ChangeMode(mode) => format!("change mode -> {}", mode),
            CommandRequest::AnalyzeSymbol(symbol) => format!("analyze {}", symbol),
            CommandRequest::RefreshStats => "refresh stats".to_string(),
        }
    }
}

/// `GET /stats` result: counters plus whatever bot state the backend echoed.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSync {
    pub stats: Stats,
    pub is_running: Option<bool>,
    pub mode: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandReply {
    Ack { message: Option<String> },
    Analysis(AnalysisReport),
    Stats(StatsSync),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("symbol is empty")]
    InvalidSymbol,

    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend rejected request ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct CommandOutcome {
    pub ticket: CommandTicket,
    pub request: CommandRequest,
    pub result: Result<CommandReply, CommandError>,
}

/// Sending half of the engine's event queue. Optionally pokes the UI
/// so a sleeping frame loop wakes up for the new event.
#[derive(Clone)]
pub struct EventSink {
    tx: Sender<EngineEvent>,
    wake: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl EventSink {
    pub fn new(tx: Sender<EngineEvent>) -> Self {
        Self { tx, wake: None }
    }

    pub fn with_wake(mut self, wake: Arc<dyn Fn() + Send + Sync>) -> Self {
        self.wake = Some(wake);
        self
    }

    /// Returns false once the engine is gone.
    pub fn send(&self, event: EngineEvent) -> bool {
        let delivered = self.tx.send(event).is_ok();
        if delivered {
            if let Some(wake) = &self.wake {
                wake();
            }
        }
        delivered
    }

    pub fn stream(&self, link: LinkId, event: StreamEvent) -> bool {
        self.send(EngineEvent::Stream { link, event })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkCommand {
    Send(String),
    Close,
}

/// Engine-side grip on one live stream link. Dropping it closes the link.
#[derive(Debug)]
pub struct LinkHandle {
    id: LinkId,
    control: UnboundedSender<LinkCommand>,
}

impl LinkHandle {
    pub fn channel(id: LinkId) -> (Self, UnboundedReceiver<LinkCommand>) {
        let (control, rx) = unbounded_channel();
        (Self { id, control }, rx)
    }

    pub fn id(&self) -> LinkId {
        self.id
    }

    pub fn send_text(&self, text: &str) -> bool {
        self.control.send(LinkCommand::Send(text.to_string())).is_ok()
    }

    pub fn close(&self) {
        let _ = self.control.send(LinkCommand::Close);
    }
}

/// Opens stream links. Results arrive later through the sink as
/// `Opened`, `Frame` and exactly one `Closed` per link.
pub trait Transport: Send {
    fn open(&self, link: LinkId, url: &str, events: EventSink) -> LinkHandle;
}

/// Executes control requests off-thread; the outcome comes back through the sink.
pub trait CommandBackend: Send {
    fn dispatch(&self, ticket: CommandTicket, request: CommandRequest, events: EventSink);
}
