use std::{cmp::Reverse, str::FromStr, time::Instant};

use chrono::{DateTime, Utc};

#[cfg(debug_assertions)]
use crate::config::DF;
use crate::{
    config::{FEED_CAPACITY, NOTICES},
    data::wire::{InboundMessage, SignalWire, Snapshot},
    domain::{Mode, Signal},
    models::{NotificationId, Severity, SignalFeed, ViewStore},
};

/// Apply one inbound message to the store. Returns the notifications it raised
/// so the caller can schedule their expiry.
pub(crate) fn route(
    store: &mut ViewStore,
    message: InboundMessage,
    now: Instant,
    wall: DateTime<Utc>,
) -> Vec<NotificationId> {
    #[cfg(debug_assertions)]
    if DF.log_router {
        log::info!("[router] {}", message.tag());
    }

    match message {
        InboundMessage::InitialState(snapshot) => {
            apply_snapshot(store, snapshot, wall);
            Vec::new()
        }
        InboundMessage::NewSignal { signal } => {
            let signal = signal.into_signal(wall);
            let text = format!("{} {}", NOTICES.new_signal_prefix, signal.headline());
            store.push_signal(signal);
            vec![store.notify(text, Severity::Success, now)]
        }
        InboundMessage::StatsUpdate { stats } => {
            store.replace_stats(stats.into_stats(), wall);
            Vec::new()
        }
        InboundMessage::BotStatus(status) => {
            match status.running() {
                Some(running) => store.set_bot_running(running),
                None => log::warn!("Ignoring bot_status with unknown status: {:?}", status.status),
            }
            Vec::new()
        }
        InboundMessage::ModeChanged { mode } => {
            apply_mode(store, &mode);
            Vec::new()
        }
        InboundMessage::Unknown => Vec::new(),
    }
}

pub(crate) fn apply_mode(store: &mut ViewStore, raw: &str) {
    match Mode::from_str(raw.trim()) {
        Ok(mode) => store.set_mode(mode),
        Err(_) => log::warn!("Ignoring unknown mode '{}'", raw),
    }
}

fn apply_snapshot(store: &mut ViewStore, snapshot: Snapshot, wall: DateTime<Utc>) {
    store.set_bot_running(snapshot.is_running);
    store.replace_stats(snapshot.stats.into_stats(), wall);
    if let Some(mode) = snapshot.current_mode.as_deref() {
        apply_mode(store, mode);
    }
    let signals = snapshot_oldest_first(snapshot.current_signals, wall);
    store.replace_feed(SignalFeed::from_oldest_first(signals, FEED_CAPACITY));
}

/// Snapshot signals in insertion order (oldest first).
///
/// When every entry carries a timestamp we trust the timestamps. Otherwise the
/// array is taken to be newest-first, which is how the backend stores it.
/// Equal timestamps (millisecond resolution) fall back to that array order.
fn snapshot_oldest_first(wires: Vec<SignalWire>, wall: DateTime<Utc>) -> Vec<Signal> {
    let all_stamped = wires.iter().all(|w| w.declared_timestamp().is_some());
    if all_stamped {
        let mut indexed: Vec<(usize, Signal)> = wires
            .into_iter()
            .map(|w| w.into_signal(wall))
            .enumerate()
            .collect();
        indexed.sort_by_key(|(i, s)| (s.timestamp, Reverse(*i)));
        indexed.into_iter().map(|(_, s)| s).collect()
    } else {
        wires.into_iter().rev().map(|w| w.into_signal(wall)).collect()
    }
}
