use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use chronod_server::app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "chronod_server=info,chronod_scheduler=info,tower_http=debug".into()
            }),
        )
        .init();

    // load config: explicit path > CHRONOD_CONFIG env > ~/.chronod/chronod.toml
    let config_path = std::env::var("CHRONOD_CONFIG").ok();
    let config = chronod_core::ChronodConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        chronod_core::ChronodConfig::default()
    });

    let bind = config.server.bind.clone();
    let port = config.server.port;

    // the user store needs its backing service up front; refuse to start
    // half-functional
    let users =
        chronod_users::RedisUserStore::connect(&config.redis.host, config.redis.port).await?;
    let scheduler = chronod_scheduler::ScheduleManager::new();

    let state = Arc::new(app::AppState::new(config, scheduler, Box::new(users)));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("chronod listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("shutdown signal received");
}
