#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use eframe::NativeOptions;
use std::path::PathBuf;
use tokio::runtime::Runtime;

use termometro::{Dashboard, PgConnector, SeriesCache, run_app};

const APP_STATE_PATH: &str = "app_state.json";

fn main() -> eframe::Result {
    // A. Init Logging
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Secrets: a local .env file, never overriding the real environment
    match dotenv::dotenv() {
        Ok(path) => log::info!("Loaded settings from {}", path.display()),
        Err(e) => log::info!("No .env file loaded ({}); using the process environment", e),
    }

    log::info!("🚀 Termômetro starting...");

    // C. Data Loading (Blocking). Store failures end up in the view, not here.
    let rt = Runtime::new().expect("Failed to create Tokio runtime");
    let mut dashboard = Dashboard::new(SeriesCache::new(PgConnector));
    rt.block_on(dashboard.load());

    // D. Run Native App
    let options = NativeOptions {
        persistence_path: Some(PathBuf::from(APP_STATE_PATH)),
        ..Default::default()
    };

    eframe::run_native(
        termometro::ui::config::UI_TEXT.window_title,
        options,
        Box::new(move |cc| Ok(run_app(cc, dashboard, rt))),
    )
}
