use anyhow::{Context, Result};
use bondalayze_infrastructure::BondaPaths;
use bondalayze_server::bootstrap;
use bondalayze_server::{AppState, router};
use std::net::SocketAddr;
use std::sync::Arc;

pub async fn run(paths: &BondaPaths, bind: Option<SocketAddr>) -> Result<()> {
    let config = bootstrap::load_config(paths)?;
    let model = bootstrap::chat_model(paths, &config)?;
    let usecase = Arc::new(bootstrap::build_usecase(model, &config));

    let app = router(AppState::new(usecase), config.server.max_body_bytes);

    let addr = match bind {
        Some(addr) => addr.to_string(),
        None => config.server.bind.clone(),
    };
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("[Server] Listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("[Server] Stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("[Server] Failed to listen for ctrl-c: {}", err);
    }
}
