mod sim;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = webstream_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = webstream_proto::platform::log_path();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug.
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("webstream log: {}", log_path.display());

    tracing::info!("webstream starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = webstream_proto::config::Config::load().unwrap_or_default();

    // ── Run simulator ────────────────────────────────────────────────────────
    sim::app::run(config).await?;

    Ok(())
}
