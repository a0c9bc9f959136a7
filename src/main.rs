#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // Windows release: hide console window
use {
    clap::Parser,
    eframe::NativeOptions,
    signal_desk::{Cli, Endpoints, run_app},
    std::panic,
};

fn main() -> eframe::Result {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));

    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Warn)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("signal_desk"), my_code_level)
        .parse_default_env()
        .init();

    let args = Cli::parse();

    // Fail before opening a window if the server URL is unusable.
    if let Err(e) = Endpoints::from_server(&args.server) {
        log::error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(2);
    }

    let options = NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Signal Desk"),
        ..Default::default()
    };

    eframe::run_native(
        "Signal Desk",
        options,
        Box::new(move |cc| Ok(Box::new(run_app(cc, args)?))),
    )
}
