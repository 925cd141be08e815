//! Actor runtime
//!
//! Hosts one actor type behind the HTTP invocation protocol. Instances are
//! activated on first invocation and discarded on deactivation.

use anyhow::Result;
use kactor_runtime::{
    actor::ScaffoldActor,
    api, config,
    registry::Registry,
    state::AppState,
};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::Config::from_env()?;

    // Initialize tracing (prefer RUST_LOG, fallback to KACTOR_LOG_LEVEL)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting actor runtime");
    info!(
        listen_addr = %config.listen_addr,
        mailbox_size = config.mailbox_size,
        invoke_timeout_secs = config.invoke_timeout.map(|t| t.as_secs()),
        "Configuration loaded"
    );

    let registry = match Registry::new::<ScaffoldActor>(config.registry()) {
        Ok(registry) => registry,
        Err(e) => {
            error!(error = %e, "Invalid actor capability table");
            return Err(e.into());
        }
    };

    // Create application state
    let state = AppState::with_invoke_timeout(registry, config.invoke_timeout);

    // Build and run the server
    let app = api::create_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %config.listen_addr, "Actor runtime started");

    // Create shutdown channel for graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let mut shutdown_rx = shutdown_rx;
                loop {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                    if shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
                info!("HTTP server shutting down");
            })
            .await
    });

    let server_done = tokio::select! {
        _ = shutdown_signal() => {
            info!("Received shutdown signal");
            false
        }
        result = &mut server_handle => {
            log_server_exit(result);
            true
        }
    };

    let _ = shutdown_tx.send(true);

    if !server_done {
        match tokio::time::timeout(config.shutdown_timeout, &mut server_handle).await {
            Ok(result) => log_server_exit(result),
            Err(_) => {
                warn!(
                    timeout_secs = config.shutdown_timeout.as_secs(),
                    "Server did not shut down in time"
                );
                server_handle.abort();
            }
        }
    }

    match tokio::time::timeout(config.shutdown_timeout, state.registry().shutdown()).await {
        Ok(discarded) => info!(discarded, "Actor runtime exiting"),
        Err(_) => {
            warn!(
                timeout_secs = config.shutdown_timeout.as_secs(),
                "Actor instances did not stop in time"
            );
            info!("Actor runtime exiting");
        }
    }
    Ok(())
}

fn log_server_exit(result: Result<std::io::Result<()>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(())) => info!("Server exited normally"),
        Ok(Err(e)) => error!(error = %e, "Server error"),
        Err(e) => error!(error = %e, "Server task panicked"),
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
