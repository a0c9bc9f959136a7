//! End-to-end engine behaviour with fake I/O.
//!
//! The engine is driven with hand-picked `Instant`s, so every timer
//! (reconnect backoff, notification expiry) is checked to the millisecond.

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use tokio::sync::mpsc::UnboundedReceiver;

use signal_desk::{
    config::{FEED_CAPACITY, NOTIFICATION_TTL},
    data::Endpoints,
    domain::{Mode, Side},
    engine::{
        CommandBackend, CommandError, CommandOutcome, CommandReply, CommandRequest, CommandTicket,
        ConnectionState, EngineEvent, EventSink, LinkCommand, LinkHandle, LinkId, LiveEngine,
        StreamEvent, Transport,
    },
    models::Severity,
};

// ============================================================================
// Fakes
// ============================================================================

struct FakeLink {
    id: LinkId,
    events: EventSink,
    _control: UnboundedReceiver<LinkCommand>,
}

#[derive(Clone, Default)]
struct FakeTransport {
    links: Arc<Mutex<Vec<FakeLink>>>,
}

impl Transport for FakeTransport {
    fn open(&self, link: LinkId, _url: &str, events: EventSink) -> LinkHandle {
        let (handle, control) = LinkHandle::channel(link);
        self.links.lock().unwrap().push(FakeLink {
            id: link,
            events,
            _control: control,
        });
        handle
    }
}

type Reply = fn(&CommandRequest) -> Result<CommandReply, CommandError>;

/// Answers synchronously with `reply` and records every request.
#[derive(Clone)]
struct ScriptedBackend {
    requests: Arc<Mutex<Vec<CommandRequest>>>,
    reply: Reply,
}

impl CommandBackend for ScriptedBackend {
    fn dispatch(&self, ticket: CommandTicket, request: CommandRequest, events: EventSink) {
        self.requests.lock().unwrap().push(request.clone());
        let result = (self.reply)(&request);
        events.send(EngineEvent::Command(CommandOutcome {
            ticket,
            request,
            result,
        }));
    }
}

fn ack(_: &CommandRequest) -> Result<CommandReply, CommandError> {
    Ok(CommandReply::Ack { message: None })
}

fn reject(_: &CommandRequest) -> Result<CommandReply, CommandError> {
    Err(CommandError::Rejected {
        status: 400,
        detail: "Bot zaten çalışıyor".to_string(),
    })
}

struct Harness {
    engine: LiveEngine,
    transport: FakeTransport,
    requests: Arc<Mutex<Vec<CommandRequest>>>,
}

impl Harness {
    fn new(reply: Reply) -> Self {
        let transport = FakeTransport::default();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let engine = LiveEngine::new(
            Endpoints::from_server("http://127.0.0.1:8000").unwrap(),
            Box::new(transport.clone()),
            Box::new(ScriptedBackend {
                requests: requests.clone(),
                reply,
            }),
        );
        Self {
            engine,
            transport,
            requests,
        }
    }

    fn links_opened(&self) -> usize {
        self.transport.links.lock().unwrap().len()
    }

    fn latest(&self) -> (LinkId, EventSink) {
        let links = self.transport.links.lock().unwrap();
        let link = links.last().expect("no link opened");
        (link.id, link.events.clone())
    }

    fn emit(&self, event: StreamEvent) {
        let (id, events) = self.latest();
        events.stream(id, event);
    }

    fn open(&mut self, now: Instant) {
        self.emit(StreamEvent::Opened);
        self.engine.pump(now);
    }

    fn fail(&mut self, now: Instant) {
        self.emit(StreamEvent::Closed {
            reason: "connection refused".to_string(),
        });
        self.engine.pump(now);
    }

    fn frame(&mut self, text: &str, now: Instant) {
        self.emit(StreamEvent::Frame(text.to_string()));
        self.engine.pump(now);
    }

    fn retry_delay_ms(&self) -> Option<u128> {
        self.engine
            .store()
            .pending_retry()
            .map(|r| r.delay.as_millis())
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn signal_frame(symbol: &str, side: &str) -> String {
    format!(
        r#"{{"type":"new_signal","signal":{{"symbol":"{}","side":"{}","entry":2.3456,"sl":2.2984,"tp1":2.3928,"tp2":2.4212,"tp3":2.4496,"score":74,"regime":"SMC","reason":"CHOCH+FVG"}}}}"#,
        symbol, side
    )
}

// ============================================================================
// Connection lifecycle
// ============================================================================

#[test]
fn test_reconnect_backoff_is_linear_then_stops() {
    let mut h = Harness::new(ack);
    let mut now = Instant::now();
    h.engine.start(now);
    assert_eq!(h.engine.store().connection(), ConnectionState::Connecting);
    assert_eq!(h.links_opened(), 1);

    for (i, expected) in [3000u64, 6000, 9000, 12000, 15000].into_iter().enumerate() {
        h.fail(now);
        assert_eq!(h.engine.store().connection(), ConnectionState::Disconnected);
        assert_eq!(h.engine.store().status_text(), "disconnected");
        assert_eq!(h.retry_delay_ms(), Some(expected as u128));

        // Not a millisecond early.
        now += ms(expected - 1);
        h.engine.pump(now);
        assert_eq!(h.links_opened(), i + 1);

        now += ms(1);
        h.engine.pump(now);
        assert_eq!(h.links_opened(), i + 2);
    }

    // Sixth failure: budget spent.
    h.fail(now);
    assert!(h.engine.store().reconnect_exhausted());
    assert_eq!(h.retry_delay_ms(), None);

    h.engine.pump(now + Duration::from_secs(3600));
    assert_eq!(h.links_opened(), 6);
    assert_eq!(h.engine.store().connection(), ConnectionState::Disconnected);
}

#[test]
fn test_successful_open_resets_backoff() {
    let mut h = Harness::new(ack);
    let mut now = Instant::now();
    h.engine.start(now);

    h.fail(now);
    now += ms(3000);
    h.engine.pump(now);
    h.fail(now);
    assert_eq!(h.retry_delay_ms(), Some(6000));

    now += ms(6000);
    h.engine.pump(now);
    h.open(now);
    assert_eq!(h.engine.store().connection(), ConnectionState::Connected);
    assert_eq!(h.engine.store().status_text(), "connected");
    assert_eq!(h.engine.connection().attempts(), 0);

    h.fail(now);
    assert_eq!(h.retry_delay_ms(), Some(3000));
}

#[test]
fn test_connect_while_live_is_a_noop() {
    let mut h = Harness::new(ack);
    let now = Instant::now();
    h.engine.start(now);
    h.engine.connect(now);
    assert_eq!(h.links_opened(), 1);

    h.open(now);
    h.engine.connect(now);
    assert_eq!(h.links_opened(), 1);
}

#[test]
fn test_manual_reconnect_after_giving_up() {
    let mut h = Harness::new(ack);
    let mut now = Instant::now();
    h.engine.start(now);
    for delay in [3000u64, 6000, 9000, 12000, 15000] {
        h.fail(now);
        now += ms(delay);
        h.engine.pump(now);
    }
    h.fail(now);
    assert!(h.engine.store().reconnect_exhausted());

    h.engine.reconnect_now(now);
    assert!(!h.engine.store().reconnect_exhausted());
    assert_eq!(h.engine.store().connection(), ConnectionState::Connecting);
    assert_eq!(h.links_opened(), 7);

    h.fail(now);
    assert_eq!(h.retry_delay_ms(), Some(3000));
}

#[test]
fn test_stale_link_events_are_ignored() {
    let mut h = Harness::new(ack);
    let now = Instant::now();
    h.engine.start(now);
    h.open(now);
    let (stale_id, stale_events) = h.latest();

    h.engine.reconnect_now(now);
    assert_eq!(h.links_opened(), 2);

    stale_events.stream(stale_id, StreamEvent::Frame(signal_frame("OLD-USDT", "LONG")));
    stale_events.stream(
        stale_id,
        StreamEvent::Closed {
            reason: "superseded".to_string(),
        },
    );
    h.engine.pump(now);

    assert!(h.engine.store().feed().is_empty());
    assert_eq!(h.retry_delay_ms(), None);
    assert_eq!(h.engine.store().connection(), ConnectionState::Connecting);
}

#[test]
fn test_shutdown_cancels_pending_reconnect() {
    let mut h = Harness::new(ack);
    let now = Instant::now();
    h.engine.start(now);
    h.fail(now);
    assert!(h.engine.next_deadline().is_some());

    h.engine.shutdown();
    assert_eq!(h.engine.pending_timers(), 0);
    h.engine.pump(now + Duration::from_secs(60));
    assert_eq!(h.links_opened(), 1);
}

// ============================================================================
// Inbound messages
// ============================================================================

#[test]
fn test_snapshot_then_live_signal() {
    let mut h = Harness::new(ack);
    let now = Instant::now();
    h.engine.start(now);
    h.open(now);

    h.frame(
        r#"{"type":"initial_state","is_running":true,"current_mode":"balanced",
            "stats":{"total_scans":42,"signals_sent":3,"last_scan":"2024-05-01T10:00:00","start_time":1714550000},
            "current_signals":[
                {"symbol":"NEWER-USDT","side":"SHORT","entry":1,"sl":1.1,"tp1":0.9,"tp2":0.8,"tp3":0.7,"timestamp":1714560000},
                {"symbol":"OLDER-USDT","side":"LONG","entry":1,"sl":0.9,"tp1":1.1,"tp2":1.2,"tp3":1.3,"timestamp":1714550000}
            ]}"#,
        now,
    );

    let store = h.engine.store();
    assert!(store.bot_running());
    assert!(store.bot_controls().stop_enabled);
    assert!(!store.bot_controls().start_enabled);
    assert_eq!(store.mode(), Some(Mode::Balanced));
    assert!(store.mode_details_visible(Mode::Balanced));
    assert_eq!(store.stats().total_scans, 42);
    assert!(store.uptime().is_some());
    let symbols: Vec<_> = store.feed().iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["NEWER-USDT", "OLDER-USDT"]);
    assert!(store.notifications().is_empty());

    h.frame(&signal_frame("WIF-USDT", "LONG"), now);
    let store = h.engine.store();
    let head = store.feed().head().unwrap();
    assert_eq!(head.symbol, "WIF-USDT");
    assert_eq!(head.side, Side::Long);
    assert_eq!(store.feed().len(), 3);

    let note = store.notifications().iter().last().unwrap();
    assert_eq!(note.message, "Yeni sinyal: WIF-USDT LONG");
    assert_eq!(note.severity, Severity::Success);
}

#[test]
fn test_feed_keeps_the_newest_twenty() {
    let mut h = Harness::new(ack);
    let now = Instant::now();
    h.engine.start(now);
    h.open(now);

    for i in 0..25 {
        h.frame(&signal_frame(&format!("S{:02}-USDT", i), "LONG"), now);
    }

    let feed = h.engine.store().feed();
    assert_eq!(feed.len(), FEED_CAPACITY);
    assert_eq!(feed.head().unwrap().symbol, "S24-USDT");
    assert_eq!(feed.iter().last().unwrap().symbol, "S05-USDT");
}

#[test]
fn test_notifications_expire_after_ttl() {
    let mut h = Harness::new(ack);
    let t0 = Instant::now();
    h.engine.start(t0);
    h.open(t0);

    h.frame(&signal_frame("A-USDT", "LONG"), t0);
    h.frame(&signal_frame("B-USDT", "SHORT"), t0 + ms(1000));
    assert_eq!(h.engine.store().notifications().len(), 2);

    h.engine.pump(t0 + NOTIFICATION_TTL - ms(1));
    assert_eq!(h.engine.store().notifications().len(), 2);

    h.engine.pump(t0 + NOTIFICATION_TTL);
    let remaining: Vec<_> = h
        .engine
        .store()
        .notifications()
        .iter()
        .map(|n| n.message.clone())
        .collect();
    assert_eq!(remaining, vec!["Yeni sinyal: B-USDT SHORT"]);

    h.engine.pump(t0 + ms(1000) + NOTIFICATION_TTL);
    assert!(h.engine.store().notifications().is_empty());
}

#[test]
fn test_unknown_and_malformed_frames_change_nothing() {
    let mut h = Harness::new(ack);
    let now = Instant::now();
    h.engine.start(now);
    h.open(now);
    let rev = h.engine.store().revision();

    h.frame(r#"{"type":"portfolio_update","value":1}"#, now);
    h.frame(r#"{"type":"ping"}"#, now);
    h.frame("not json at all", now);
    h.frame(r#"{"type":"new_signal","signal":{"symbol":"BROKEN"}}"#, now);
    h.frame(r#"{"type":"mode_changed","mode":"reckless"}"#, now);

    assert_eq!(h.engine.store().revision(), rev);
    assert_eq!(h.engine.store().connection(), ConnectionState::Connected);
}

// ============================================================================
// Control commands
// ============================================================================

#[test]
fn test_change_mode_waits_for_the_push() {
    let mut h = Harness::new(ack);
    let now = Instant::now();
    h.engine.start(now);
    h.open(now);
    h.frame(r#"{"type":"mode_changed","mode":"balanced"}"#, now);

    h.engine.change_mode(Mode::Aggressive);
    h.engine.pump(now);
    assert_eq!(h.engine.store().mode(), Some(Mode::Balanced));
    assert_eq!(
        h.requests.lock().unwrap().as_slice(),
        &[CommandRequest::ChangeMode(Mode::Aggressive)]
    );

    h.frame(r#"{"type":"mode_changed","mode":"aggressive"}"#, now);
    assert_eq!(h.engine.store().mode(), Some(Mode::Aggressive));
    assert!(h.engine.store().mode_details_visible(Mode::Aggressive));
    assert!(!h.engine.store().mode_details_visible(Mode::Balanced));
}

#[test]
fn test_blank_symbol_is_rejected_locally() {
    let mut h = Harness::new(ack);
    let now = Instant::now();

    assert!(h.engine.analyze_symbol("   ", now).is_none());
    assert!(h.requests.lock().unwrap().is_empty());

    let note = h.engine.store().notifications().iter().last().unwrap();
    assert_eq!(note.severity, Severity::Error);

    h.engine.pump(now + NOTIFICATION_TTL);
    assert!(h.engine.store().notifications().is_empty());
}

#[test]
fn test_symbol_is_normalised_before_sending() {
    let mut h = Harness::new(ack);
    let now = Instant::now();
    h.engine.analyze_symbol("  wif-usdt ", now);
    h.engine.pump(now);
    assert_eq!(
        h.requests.lock().unwrap().as_slice(),
        &[CommandRequest::AnalyzeSymbol("WIF-USDT".to_string())]
    );
}

#[test]
fn test_failed_command_raises_error_and_keeps_state() {
    let mut h = Harness::new(reject);
    let now = Instant::now();

    h.engine.start_bot();
    h.engine.pump(now);

    let store = h.engine.store();
    assert!(!store.bot_running());
    let note = store.notifications().iter().last().unwrap();
    assert_eq!(note.severity, Severity::Error);
    assert!(note.message.contains("Bot zaten çalışıyor"));
    assert_eq!(h.engine.commands_in_flight(), 0);
}

#[test]
fn test_bot_state_follows_push_not_ack() {
    let mut h = Harness::new(ack);
    let now = Instant::now();
    h.engine.start(now);
    h.open(now);

    h.engine.start_bot();
    h.engine.pump(now);
    assert!(!h.engine.store().bot_running());

    h.frame(r#"{"type":"bot_status","status":"started"}"#, now);
    assert!(h.engine.store().bot_running());
    assert!(h.engine.store().bot_controls().stop_enabled);
}
