use std::process::ExitCode;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use spotirelay::config::{Config, Mode};
use spotirelay::server::{AppState, create_router};

/// How often idle sessions are swept out of the store.
const SESSION_PRUNE_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() -> ExitCode {
    // The mode must come from the process environment; it decides which
    // env file to load.
    let mode = Mode::from_env();
    let _ = dotenv::from_filename(mode.env_file());
    let _ = dotenv::dotenv();

    init_logging(mode);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "failed to load configuration");
            eprintln!("Error: {err}");
            eprintln!();
            eprintln!("Required environment variables:");
            eprintln!("  SPOTIFY_CLIENT_ID      - OAuth client id");
            eprintln!("  SPOTIFY_CLIENT_SECRET  - OAuth client secret");
            eprintln!();
            eprintln!("Optional environment variables:");
            eprintln!("  REDIRECT_URI           - registered callback (default: http://localhost:5000/callback)");
            eprintln!("  SERVER_ADDRESS         - bind address (default: 127.0.0.1:5000)");
            eprintln!("  SPOTIRELAY_MODE        - development / production");
            eprintln!("  RUST_LOG               - log level filter");
            return ExitCode::from(1);
        }
    };

    info!(mode = ?config.mode, address = %config.server_address, "playlist relay starting");

    let state = AppState::new(config.clone());
    let prune_handle = state.sessions.spawn_prune_task(SESSION_PRUNE_INTERVAL);

    let app = create_router(state);

    let listener = match TcpListener::bind(&config.server_address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, address = %config.server_address, "failed to bind");
            return ExitCode::from(1);
        }
    };
    info!(address = %config.server_address, "listening");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());
    if let Err(err) = server.await {
        error!(error = %err, "server error");
        return ExitCode::from(1);
    }

    prune_handle.abort();
    info!("shutdown complete");
    ExitCode::SUCCESS
}

fn init_logging(mode: Mode) {
    let default_filter = if mode == Mode::Development {
        "spotirelay=debug,info"
    } else {
        "info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .init();
}

/// Resolves when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
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
        _ = ctrl_c => {
            info!("received SIGINT, shutting down");
        }
        _ = terminate => {
            info!("received SIGTERM, shutting down");
        }
    }
}
