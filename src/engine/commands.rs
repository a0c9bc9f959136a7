use std::{collections::HashMap, time::Instant};

use chrono::{DateTime, Utc};

#[cfg(debug_assertions)]
use crate::config::DF;
use crate::{
    config::NOTICES,
    models::{NotificationId, Severity, ViewStore},
};

use super::{
    messages::{
        CommandBackend, CommandError, CommandOutcome, CommandReply, CommandRequest, CommandTicket,
        EventSink,
    },
    router::apply_mode,
};

/// Trim and uppercase a user-typed symbol. Empty input is rejected locally.
pub fn normalize_symbol(raw: &str) -> Result<String, CommandError> {
    let symbol = raw.trim();
    if symbol.is_empty() {
        return Err(CommandError::InvalidSymbol);
    }
    Ok(symbol.to_uppercase())
}

/// Issues control requests and turns their outcomes into notifications.
/// Requests are independent; nothing is serialised or deduplicated.
#[derive(Debug, Default)]
pub struct CommandGateway {
    next_ticket: u64,
    in_flight: HashMap<CommandTicket, CommandRequest>,
}

impl CommandGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_pending(&self, matches: impl Fn(&CommandRequest) -> bool) -> bool {
        self.in_flight.values().any(matches)
    }

    pub(crate) fn issue(
        &mut self,
        request: CommandRequest,
        backend: &dyn CommandBackend,
        events: &EventSink,
    ) -> CommandTicket {
        self.next_ticket += 1;
        let ticket = CommandTicket(self.next_ticket);

        #[cfg(debug_assertions)]
        if DF.log_commands {
            log::info!("[cmd #{}] -> {}", ticket.0, request.label());
        }

        self.in_flight.insert(ticket, request.clone());
        backend.dispatch(ticket, request, events.clone());
        ticket
    }

    /// Apply a finished request. Returns the notification it raised, if any.
    pub(crate) fn settle(
        &mut self,
        outcome: CommandOutcome,
        store: &mut ViewStore,
        now: Instant,
        wall: DateTime<Utc>,
    ) -> Option<NotificationId> {
        if self.in_flight.remove(&outcome.ticket).is_none() {
            log::warn!("Dropping outcome for unknown ticket #{}", outcome.ticket.0);
            return None;
        }

        let CommandOutcome {
            ticket,
            request,
            result,
        } = outcome;

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("[cmd #{}] {} failed: {}", ticket.0, request.label(), e);
                return Some(store.notify(failure_text(&e), Severity::Error, now));
            }
        };

        #[cfg(debug_assertions)]
        if DF.log_commands {
            log::info!("[cmd #{}] <- {} ok", ticket.0, request.label());
        }

        let (text, severity) = match (&request, reply) {
            (CommandRequest::StartBot, CommandReply::Ack { message }) => (
                message.unwrap_or_else(|| NOTICES.bot_started.to_string()),
                Severity::Success,
            ),
            (CommandRequest::StopBot, CommandReply::Ack { message }) => (
                message.unwrap_or_else(|| NOTICES.bot_stopped.to_string()),
                Severity::Success,
            ),
            // The mode itself only changes when the backend pushes mode_changed.
            (CommandRequest::ChangeMode(mode), CommandReply::Ack { .. }) => (
                format!("{} {}", NOTICES.mode_changed_prefix, mode.label()),
                Severity::Success,
            ),
            (_, CommandReply::Analysis(report)) => {
                let text = format!("{} {}", NOTICES.analysis_ready_prefix, report.symbol);
                store.set_analysis(report);
                (text, Severity::Info)
            }
            (_, CommandReply::Stats(sync)) => {
                store.replace_stats(sync.stats, wall);
                if let Some(running) = sync.is_running {
                    store.set_bot_running(running);
                }
                if let Some(mode) = sync.mode.as_deref() {
                    apply_mode(store, mode);
                }
                (NOTICES.stats_refreshed.to_string(), Severity::Info)
            }
            (_, CommandReply::Ack { message }) => (
                message.unwrap_or_else(|| request.label()),
                Severity::Success,
            ),
        };

        Some(store.notify(text, severity, now))
    }
}

fn failure_text(error: &CommandError) -> String {
    match error {
        CommandError::InvalidSymbol => NOTICES.empty_symbol.to_string(),
        CommandError::Http(e) => format!("{}: {}", NOTICES.network_error_prefix, e),
        CommandError::Rejected { detail, .. } => {
            format!("{}: {}", NOTICES.request_failed_prefix, detail)
        }
        CommandError::Decode(e) => format!("{}: {}", NOTICES.request_failed_prefix, e),
    }
}
