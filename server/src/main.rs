use anyhow::Context;
use clap::Parser;
use wumpus_server::{Args, ServerConfig, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .parse_default_env()
        .init();

    let config = ServerConfig::from(&args);
    log::debug!("{config:?}");

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Could not bind to {}", config.bind))?;
    log::info!(
        "listening on ws://{}{}",
        listener.local_addr().context("Listener has no address")?,
        config.path
    );

    axum::serve(listener, router(&config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    log::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Could not listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
