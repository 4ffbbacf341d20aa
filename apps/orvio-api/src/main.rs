//! orvio API server.
//!
//! Exposes the scheduled batch trigger, manual sync trigger, webhook
//! ingestion endpoint and tenant-scoped analytics reads over HTTP.

use orvio_api::config::Config;
use orvio_api::state::AppState;
use orvio_api::{logging, routes};
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.log_filter);

    let pool = match orvio_db::connect(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if config.run_migrations {
        if let Err(e) = orvio_db::run_migrations(&pool).await {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    let bind_addr = config.bind_addr;
    let app = routes::router(AppState::new(pool, config));

    let listener = match tokio::net::TcpListener::bind(bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Error: failed to bind {bind_addr}: {e}");
            std::process::exit(1);
        }
    };

    info!(addr = %bind_addr, "orvio-api listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("Error: server exited: {e}");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
