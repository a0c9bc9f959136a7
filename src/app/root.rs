use {
    anyhow::{Context as _, Result},
    eframe::{Frame, egui::Context},
    std::{sync::Arc, time::Instant},
    tokio::runtime::{Builder, Runtime},
};

#[cfg(debug_assertions)]
use crate::config::DF;
use crate::{
    Cli,
    app::UiAction,
    config::IDLE_REPAINT,
    data::{Endpoints, HttpBackend, WsTransport},
    engine::LiveEngine,
    ui::setup_custom_visuals,
};

pub struct App {
    pub(crate) engine: LiveEngine,
    pub(crate) symbol_input: String,
    pub(crate) actions: Vec<UiAction>,
    // Dropped after the engine, so link tasks see their handles close first.
    _runtime: Runtime,
}

/// I/O runtime shared by the stream link and the control requests.
pub fn build_io_runtime() -> Result<Runtime> {
    Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("signal-io")
        .enable_all()
        .build()
        .context("failed to start I/O runtime")
}

/// Engine wired to the real network transports.
pub fn build_live_engine(runtime: &Runtime, endpoints: Endpoints) -> Result<LiveEngine> {
    let transport = WsTransport::new(runtime.handle().clone());
    let backend = HttpBackend::new(runtime.handle().clone(), endpoints.clone())
        .context("failed to build HTTP client")?;
    Ok(LiveEngine::new(
        endpoints,
        Box::new(transport),
        Box::new(backend),
    ))
}

impl App {
    pub(crate) fn new(cc: &eframe::CreationContext<'_>, args: Cli) -> Result<Self> {
        let endpoints = Endpoints::from_server(&args.server)?;
        log::info!(
            "Backend: {} (stream {})",
            endpoints.http_base(),
            endpoints.stream_url()
        );

        setup_custom_visuals(&cc.egui_ctx);

        let runtime = build_io_runtime()?;
        let mut engine = build_live_engine(&runtime, endpoints)?;

        let repaint_ctx = cc.egui_ctx.clone();
        engine.set_waker(Arc::new(move || repaint_ctx.request_repaint()));
        engine.start(Instant::now());

        Ok(Self {
            engine,
            symbol_input: String::new(),
            actions: Vec::new(),
            _runtime: runtime,
        })
    }

    fn apply_actions(&mut self, now: Instant) {
        for action in std::mem::take(&mut self.actions) {
            match action {
                UiAction::StartBot => {
                    self.engine.start_bot();
                }
                UiAction::StopBot => {
                    self.engine.stop_bot();
                }
                UiAction::ChangeMode(mode) => {
                    self.engine.change_mode(mode);
                }
                UiAction::Analyze(raw) => {
                    self.engine.analyze_symbol(&raw, now);
                }
                UiAction::RefreshStats => {
                    self.engine.refresh_stats();
                }
                UiAction::Reconnect => self.engine.reconnect_now(now),
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        let now = Instant::now();
        self.engine.pump(now);

        let _changes = self.engine.drain_changes();
        #[cfg(debug_assertions)]
        if DF.log_notifications && !_changes.is_empty() {
            log::info!("view changes: {:?}", _changes);
        }

        self.render_top_panel(ctx);
        self.render_left_panel(ctx);
        self.render_central_panel(ctx);
        self.render_notifications(ctx);

        self.apply_actions(now);

        // Wake for the next timer even if no I/O arrives.
        let wait = self
            .engine
            .next_deadline()
            .map(|due| due.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_REPAINT)
            .min(IDLE_REPAINT);
        ctx.request_repaint_after(wait);
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.engine.shutdown();
    }
}
