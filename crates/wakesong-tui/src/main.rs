mod action;
mod app;
mod app_state;
mod component;
mod components;
mod focus;
mod theme;
mod widgets;

use tracing::info;

use wakesong_core::backend::Backend;
use wakesong_core::config::Config;
use wakesong_core::video::VideoLookup;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = dirs::data_dir()
        .map(|p| p.join("wakesong"))
        .unwrap_or_else(|| std::env::temp_dir().join("wakesong"));
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("tui.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress
    // noisy connection-level DEBUG from HTTP client internals.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("wakesong log: {}", log_path.display());

    info!("wakesong starting…");

    // Missing backend configuration is fatal here, before any UI comes up;
    // the diagnostic naming the variable is already on the log.
    let config = Config::from_env()?;
    let backend = Backend::new(&config)?;
    let lookup = VideoLookup::new(config.youtube_api_key.clone());

    app::App::new(backend, lookup, config.requester).run().await
}
