use std::sync::{
    Arc,
    mpsc::{Receiver, RecvTimeoutError, channel},
};
use std::time::{Duration, Instant};

use chrono::Utc;

#[cfg(debug_assertions)]
use crate::config::DF;
use crate::{
    config::{BACKEND, NOTICES, NOTIFICATION_TTL, ReconnectPolicy, UPTIME_REFRESH},
    data::{
        Endpoints,
        wire::{is_heartbeat_reply, parse_frame},
    },
    domain::Mode,
    models::{NotificationId, PendingRetry, Severity, ViewChange, ViewStore},
};

use super::{
    commands::{CommandGateway, normalize_symbol},
    connection::{ConnectionManager, ConnectionState, ReconnectDecision},
    messages::{
        CommandBackend, CommandRequest, CommandTicket, EngineEvent, EventSink, LinkHandle, LinkId,
        StreamEvent, Transport,
    },
    router,
    timers::{TimerHandle, TimerKind, TimerSet},
};

/// Single-threaded owner of all dashboard state.
///
/// I/O runs elsewhere and reports through the event queue; the engine only
/// changes state inside `pump`, or in the operation methods the UI calls.
/// Both take `now` so tests can drive time by hand.
pub struct LiveEngine {
    store: ViewStore,
    connection: ConnectionManager,
    gateway: CommandGateway,
    timers: TimerSet,
    endpoints: Endpoints,

    transport: Box<dyn Transport>,
    backend: Box<dyn CommandBackend>,

    events: EventSink,
    events_rx: Receiver<EngineEvent>,

    link: Option<LinkHandle>,
    reconnect_timer: Option<TimerHandle>,
    heartbeat_timer: Option<TimerHandle>,
    uptime_timer: Option<TimerHandle>,
}

impl LiveEngine {
    pub fn new(
        endpoints: Endpoints,
        transport: Box<dyn Transport>,
        backend: Box<dyn CommandBackend>,
    ) -> Self {
        Self::with_policy(endpoints, transport, backend, ReconnectPolicy::default())
    }

    pub fn with_policy(
        endpoints: Endpoints,
        transport: Box<dyn Transport>,
        backend: Box<dyn CommandBackend>,
        policy: ReconnectPolicy,
    ) -> Self {
        let (tx, events_rx) = channel();
        Self {
            store: ViewStore::new(),
            connection: ConnectionManager::new(policy),
            gateway: CommandGateway::new(),
            timers: TimerSet::new(),
            endpoints,
            transport,
            backend,
            events: EventSink::new(tx),
            events_rx,
            link: None,
            reconnect_timer: None,
            heartbeat_timer: None,
            uptime_timer: None,
        }
    }

    /// Call `wake` whenever an I/O event is queued (e.g. to request a repaint).
    pub fn set_waker(&mut self, wake: Arc<dyn Fn() + Send + Sync>) {
        self.events = self.events.clone().with_wake(wake);
    }

    // --- Accessors ---

    pub fn store(&self) -> &ViewStore {
        &self.store
    }

    pub fn drain_changes(&mut self) -> Vec<ViewChange> {
        self.store.drain_changes()
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn commands_in_flight(&self) -> usize {
        self.gateway.in_flight()
    }

    pub fn analysis_pending(&self) -> bool {
        self.gateway
            .is_pending(|r| matches!(r, CommandRequest::AnalyzeSymbol(_)))
    }

    /// Sender into this engine's event queue. Events are applied on the next pump.
    pub fn event_sink(&self) -> EventSink {
        self.events.clone()
    }

    /// When the next timer is due; the UI sleeps until then at the latest.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_due()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // --- Lifecycle ---

    /// Open the stream and start the uptime clock.
    pub fn start(&mut self, now: Instant) {
        self.connect(now);
        if self.uptime_timer.is_none() {
            self.uptime_timer = Some(self.schedule(TimerKind::UptimeRefresh, now + UPTIME_REFRESH));
        }
    }

    /// Open a stream link unless one is already connecting or open.
    pub fn connect(&mut self, _now: Instant) {
        let Some(link) = self.connection.begin_connect() else {
            #[cfg(debug_assertions)]
            if DF.log_stream_frames {
                log::info!("connect() ignored: link already {}", self.connection.state());
            }
            return;
        };
        self.cancel_timer_slot(TimerSlot::Reconnect);
        self.store.set_retry(None);
        self.open_link(link);
    }

    /// Manual retry: drop whatever is live, reset the retry budget, connect now.
    pub fn reconnect_now(&mut self, _now: Instant) {
        self.cancel_timer_slot(TimerSlot::Reconnect);
        self.cancel_timer_slot(TimerSlot::Heartbeat);
        if let Some(old) = self.link.take() {
            old.close();
        }
        let (_, link) = self.connection.restart();
        self.store.set_reconnect_exhausted(false);
        self.store.set_retry(None);
        log::info!("Manual reconnect requested");
        self.open_link(link);
    }

    /// Close the link and cancel every timer. Late I/O events are ignored.
    pub fn shutdown(&mut self) {
        let cancelled = self.timers.cancel_all();
        self.reconnect_timer = None;
        self.heartbeat_timer = None;
        self.uptime_timer = None;
        if let Some(link) = self.link.take() {
            link.close();
        }
        self.connection.shutdown();
        self.store.set_connection(ConnectionState::Disconnected);
        self.store.set_retry(None);
        log::info!("Engine shut down ({} timers cancelled)", cancelled);
    }

    // --- Control operations ---

    pub fn start_bot(&mut self) -> CommandTicket {
        self.issue(CommandRequest::StartBot)
    }

    pub fn stop_bot(&mut self) -> CommandTicket {
        self.issue(CommandRequest::StopBot)
    }

    /// The displayed mode is left alone; it follows the backend's `mode_changed` push.
    pub fn change_mode(&mut self, mode: Mode) -> CommandTicket {
        self.issue(CommandRequest::ChangeMode(mode))
    }

    pub fn refresh_stats(&mut self) -> CommandTicket {
        self.issue(CommandRequest::RefreshStats)
    }

    /// Blank input raises an error notification and sends nothing.
    pub fn analyze_symbol(&mut self, raw: &str, now: Instant) -> Option<CommandTicket> {
        match normalize_symbol(raw) {
            Ok(symbol) => Some(self.issue(CommandRequest::AnalyzeSymbol(symbol))),
            Err(e) => {
                log::warn!("Analysis request rejected locally: {}", e);
                let id = self.store.notify(NOTICES.empty_symbol, Severity::Error, now);
                self.schedule_expiry(id, now);
                None
            }
        }
    }

    fn issue(&mut self, request: CommandRequest) -> CommandTicket {
        self.gateway
            .issue(request, self.backend.as_ref(), &self.events)
    }

    // --- The loop ---

    /// Apply queued I/O events, then fire due timers. Returns how much work was done.
    pub fn pump(&mut self, now: Instant) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event, now);
            handled += 1;
        }
        for (handle, kind) in self.timers.take_due(now) {
            self.fire_timer(handle, kind, now);
            handled += 1;
        }
        handled
    }

    /// Headless variant: block up to `max_wait` (or the next timer) for an event, then pump.
    pub fn pump_blocking(&mut self, max_wait: Duration) -> usize {
        let wait = match self.timers.next_due() {
            Some(due) => due.saturating_duration_since(Instant::now()).min(max_wait),
            None => max_wait,
        };
        let mut handled = 0;
        match self.events_rx.recv_timeout(wait) {
            Ok(event) => {
                self.handle_event(event, Instant::now());
                handled += 1;
            }
            Err(RecvTimeoutError::Timeout) => {}
            // We hold a sender ourselves, so this cannot happen.
            Err(RecvTimeoutError::Disconnected) => {}
        }
        handled + self.pump(Instant::now())
    }

    fn handle_event(&mut self, event: EngineEvent, now: Instant) {
        match event {
            EngineEvent::Stream { link, event } => self.handle_stream(link, event, now),
            EngineEvent::Command(outcome) => {
                let wall = Utc::now();
                if let Some(id) = self.gateway.settle(outcome, &mut self.store, now, wall) {
                    self.schedule_expiry(id, now);
                }
            }
        }
    }

    fn handle_stream(&mut self, link: LinkId, event: StreamEvent, now: Instant) {
        match event {
            StreamEvent::Opened => {
                if !self.connection.on_open(link) {
                    log::debug!("Ignoring open from stale link {:?}", link);
                    return;
                }
                log::info!("Stream connected ({})", self.endpoints.stream_url());
                self.store.set_connection(ConnectionState::Connected);
                self.cancel_timer_slot(TimerSlot::Reconnect);
                self.store.set_retry(None);
                self.store.set_reconnect_exhausted(false);
                self.arm_heartbeat(now);
            }
            StreamEvent::Frame(text) => {
                if !self.connection.is_current(link) {
                    return;
                }
                #[cfg(debug_assertions)]
                if DF.log_stream_frames {
                    log::info!("[frame] {}", text);
                }
                if is_heartbeat_reply(&text) {
                    log::debug!("heartbeat reply on link {}", link.0);
                    return;
                }
                match parse_frame(&text) {
                    Ok(message) => {
                        let raised = router::route(&mut self.store, message, now, Utc::now());
                        for id in raised {
                            self.schedule_expiry(id, now);
                        }
                    }
                    Err(e) => log::warn!("Dropping malformed frame: {}", e),
                }
            }
            StreamEvent::Closed { reason } => {
                let Some(decision) = self.connection.on_closed(link) else {
                    return;
                };
                self.link = None;
                self.cancel_timer_slot(TimerSlot::Heartbeat);
                self.store.set_connection(ConnectionState::Disconnected);

                match decision {
                    ReconnectDecision::Retry { attempt, delay } => {
                        let max_attempts = self.connection.policy().max_attempts;
                        log::warn!(
                            "Stream closed ({}). Reconnect {}/{} in {:?}",
                            reason,
                            attempt,
                            max_attempts,
                            delay
                        );
                        self.cancel_timer_slot(TimerSlot::Reconnect);
                        self.reconnect_timer = Some(self.schedule(TimerKind::Reconnect, now + delay));
                        self.store.set_retry(Some(PendingRetry {
                            attempt,
                            max_attempts,
                            delay,
                        }));
                    }
                    ReconnectDecision::GiveUp => {
                        log::error!(
                            "Stream closed ({}). Giving up after {} attempts",
                            reason,
                            self.connection.policy().max_attempts
                        );
                        self.store.set_retry(None);
                        self.store.set_reconnect_exhausted(true);
                    }
                }
            }
        }
    }

    fn fire_timer(&mut self, handle: TimerHandle, kind: TimerKind, now: Instant) {
        #[cfg(debug_assertions)]
        if DF.log_timers {
            log::info!("[timer] {:?} fired", kind);
        }

        match kind {
            TimerKind::Reconnect => {
                if self.reconnect_timer == Some(handle) {
                    self.reconnect_timer = None;
                }
                self.store.set_retry(None);
                self.connect(now);
            }
            TimerKind::Heartbeat => {
                self.heartbeat_timer = None;
                if self.connection.state() == ConnectionState::Connected {
                    if let Some(link) = &self.link {
                        link.send_text(BACKEND.stream.heartbeat_payload);
                    }
                    self.arm_heartbeat(now);
                }
            }
            TimerKind::UptimeRefresh => {
                self.store.refresh_uptime(Utc::now());
                self.uptime_timer = Some(self.schedule(TimerKind::UptimeRefresh, now + UPTIME_REFRESH));
            }
            TimerKind::NotificationExpiry(id) => {
                self.store.dismiss_notification(id);
            }
        }
    }

    // --- Helpers ---

    fn open_link(&mut self, link: LinkId) {
        self.store.set_connection(ConnectionState::Connecting);
        let handle = self
            .transport
            .open(link, self.endpoints.stream_url(), self.events.clone());
        self.link = Some(handle);
    }

    fn arm_heartbeat(&mut self, now: Instant) {
        self.cancel_timer_slot(TimerSlot::Heartbeat);
        self.heartbeat_timer = Some(self.schedule(
            TimerKind::Heartbeat,
            now + BACKEND.stream.heartbeat_interval,
        ));
    }

    fn schedule_expiry(&mut self, id: NotificationId, now: Instant) {
        self.schedule(TimerKind::NotificationExpiry(id), now + NOTIFICATION_TTL);
    }

    fn schedule(&mut self, kind: TimerKind, due: Instant) -> TimerHandle {
        #[cfg(debug_assertions)]
        if DF.log_timers {
            log::info!("[timer] {:?} scheduled", kind);
        }
        self.timers.schedule(kind, due)
    }

    fn cancel_timer_slot(&mut self, slot: TimerSlot) {
        let handle = match slot {
            TimerSlot::Reconnect => self.reconnect_timer.take(),
            TimerSlot::Heartbeat => self.heartbeat_timer.take(),
        };
        if let Some(handle) = handle {
            self.timers.cancel(handle);
        }
    }
}

enum TimerSlot {
    Reconnect,
    Heartbeat,
}

impl Drop for LiveEngine {
    fn drop(&mut self) {
        if let Some(link) = self.link.take() {
            link.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::engine::{CommandOutcome, CommandReply, messages::LinkCommand};
    use tokio::sync::mpsc::UnboundedReceiver;

    type Opened = Arc<Mutex<Vec<(LinkId, UnboundedReceiver<LinkCommand>)>>>;

    /// Hands out links without touching the network.
    #[derive(Clone, Default)]
    struct FakeTransport {
        opened: Opened,
    }

    impl Transport for FakeTransport {
        fn open(&self, link: LinkId, _url: &str, _events: EventSink) -> LinkHandle {
            let (handle, rx) = LinkHandle::channel(link);
            self.opened.lock().unwrap().push((link, rx));
            handle
        }
    }

    /// Acks everything immediately.
    struct AckBackend;

    impl CommandBackend for AckBackend {
        fn dispatch(&self, ticket: CommandTicket, request: CommandRequest, events: EventSink) {
            events.send(EngineEvent::Command(CommandOutcome {
                ticket,
                request,
                result: Ok(CommandReply::Ack { message: None }),
            }));
        }
    }

    fn engine() -> (LiveEngine, FakeTransport) {
        let transport = FakeTransport::default();
        let engine = LiveEngine::new(
            Endpoints::from_server("http://localhost:8000").unwrap(),
            Box::new(transport.clone()),
            Box::new(AckBackend),
        );
        (engine, transport)
    }

    fn last_link(t: &FakeTransport) -> LinkId {
        t.opened.lock().unwrap().last().unwrap().0
    }

    #[test]
    fn heartbeat_goes_out_while_connected() {
        let (mut engine, transport) = engine();
        let t0 = Instant::now();
        engine.start(t0);
        let link = last_link(&transport);
        engine.event_sink().stream(link, StreamEvent::Opened);
        engine.pump(t0);

        engine.pump(t0 + BACKEND.stream.heartbeat_interval);
        let mut opened = transport.opened.lock().unwrap();
        let rx = &mut opened.last_mut().unwrap().1;
        assert_eq!(
            rx.try_recv().unwrap(),
            LinkCommand::Send(BACKEND.stream.heartbeat_payload.to_string())
        );
    }

    #[test]
    fn shutdown_cancels_everything() {
        let (mut engine, transport) = engine();
        let t0 = Instant::now();
        engine.start(t0);
        let link = last_link(&transport);
        engine.event_sink().stream(link, StreamEvent::Closed { reason: "refused".into() });
        engine.pump(t0);
        assert!(engine.pending_timers() >= 2);

        engine.shutdown();
        assert_eq!(engine.pending_timers(), 0);
        assert_eq!(engine.next_deadline(), None);

        engine.pump(t0 + Duration::from_secs(60));
        assert_eq!(transport.opened.lock().unwrap().len(), 1);
        assert_eq!(engine.store().connection(), ConnectionState::Disconnected);
    }

    #[test]
    fn acks_raise_expiring_notifications() {
        let (mut engine, _transport) = engine();
        let t0 = Instant::now();
        engine.start_bot();
        engine.pump(t0);
        assert_eq!(engine.store().notifications().len(), 1);
        assert_eq!(engine.commands_in_flight(), 0);

        engine.pump(t0 + NOTIFICATION_TTL - Duration::from_millis(1));
        assert_eq!(engine.store().notifications().len(), 1);
        engine.pump(t0 + NOTIFICATION_TTL);
        assert!(engine.store().notifications().is_empty());
    }

    #[test]
    fn open_cancels_pending_backoff() {
        let (mut engine, transport) = engine();
        let t0 = Instant::now();
        engine.start(t0);
        let first = last_link(&transport);
        engine.event_sink().stream(first, StreamEvent::Closed { reason: "refused".into() });
        engine.pump(t0);
        assert!(engine.store().pending_retry().is_some());
        assert_eq!(engine.next_deadline(), Some(t0 + Duration::from_millis(3000)));

        engine.connect(t0);
        assert!(engine.store().pending_retry().is_none());
        let second = last_link(&transport);
        engine.event_sink().stream(second, StreamEvent::Opened);
        engine.pump(t0);

        assert_eq!(engine.store().connection(), ConnectionState::Connected);
        assert_eq!(engine.next_deadline(), Some(t0 + UPTIME_REFRESH));
        engine.pump(t0 + Duration::from_millis(3000));
        assert_eq!(transport.opened.lock().unwrap().len(), 2);
        assert_eq!(engine.store().connection(), ConnectionState::Connected);
    }

    #[test]
    fn heartbeat_reply_changes_nothing() {
        let (mut engine, transport) = engine();
        let t0 = Instant::now();
        engine.start(t0);
        let link = last_link(&transport);
        engine.event_sink().stream(link, StreamEvent::Opened);
        engine.pump(t0);
        let rev = engine.store().revision();

        engine.event_sink().stream(link, StreamEvent::Frame("pong".into()));
        assert_eq!(engine.pump(t0), 1);
        assert_eq!(engine.store().revision(), rev);
        assert_eq!(engine.store().connection(), ConnectionState::Connected);
    }
}
