//! Headless client: connects to the backend and logs what the dashboard would show.

use {
    anyhow::Result,
    clap::Parser,
    signal_desk::{Endpoints, build_io_runtime, build_live_engine, models::ViewChange, utils::format_duration},
    std::time::{Duration, Instant},
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Tail the signal feed without a window", long_about = None)]
struct Args {
    #[arg(long, env = "SIGNAL_DESK_SERVER", default_value = signal_desk::config::DEFAULT_SERVER_URL)]
    server: String,

    /// Stop after this many seconds (runs until killed otherwise)
    #[arg(long)]
    for_secs: Option<u64>,

    /// Request an analysis for this symbol once at startup
    #[arg(long)]
    analyze: Option<String>,

    /// Fetch /stats once at startup
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter(None, log::LevelFilter::Warn)
        .filter(Some("signal_desk"), log::LevelFilter::Info)
        .filter(Some("feed_tail"), log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let endpoints = Endpoints::from_server(&args.server)?;
    let runtime = build_io_runtime()?;
    let mut engine = build_live_engine(&runtime, endpoints)?;

    let started = Instant::now();
    engine.start(started);
    if args.stats {
        engine.refresh_stats();
    }
    if let Some(symbol) = &args.analyze {
        engine.analyze_symbol(symbol, started);
    }

    let deadline = args.for_secs.map(|s| started + Duration::from_secs(s));
    let mut last_feed_head = None;
    let mut last_note = None;

    while deadline.is_none_or(|d| Instant::now() < d) {
        engine.pump_blocking(Duration::from_millis(250));

        for change in engine.drain_changes() {
            let store = engine.store();
            match change {
                ViewChange::Connection => log::info!("connection: {}", store.status_text()),
                ViewChange::Retry => {
                    if let Some(retry) = store.pending_retry() {
                        log::info!(
                            "retry {}/{} in {}",
                            retry.attempt,
                            retry.max_attempts,
                            format_duration(retry.delay)
                        );
                    } else if store.reconnect_exhausted() {
                        log::error!("giving up; restart to try again");
                    }
                }
                ViewChange::Bot => log::info!("bot running: {}", store.bot_running()),
                ViewChange::Mode => log::info!("mode: {:?}", store.mode()),
                ViewChange::Stats => {
                    let s = store.stats();
                    log::info!("stats: {} scans, {} signals sent", s.total_scans, s.signals_sent);
                }
                ViewChange::Uptime => {}
                ViewChange::Feed => {
                    let head = store.feed().head().map(|s| s.to_string());
                    if head != last_feed_head {
                        if let Some(line) = &head {
                            log::info!("feed ({}): {}", store.feed().len(), line);
                        }
                        last_feed_head = head;
                    }
                }
                ViewChange::Notifications => {
                    // Also fires on expiry; only log ones we have not seen.
                    if let Some(note) = store.notifications().iter().last() {
                        if last_note.is_none_or(|seen| note.id > seen) {
                            log::info!("[{}] {}", note.severity, note.message);
                            last_note = Some(note.id);
                        }
                    }
                }
                ViewChange::Analysis => {
                    if let Some(report) = store.analysis() {
                        log::info!("analysis {}: {:?}", report.symbol, report.rows());
                    }
                }
            }
        }
    }

    engine.shutdown();
    Ok(())
}
