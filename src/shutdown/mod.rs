//! Graceful shutdown handling.
//!
//! The server stops accepting connections once Ctrl+C or SIGTERM arrives
//! and drains in-flight requests before exiting.

use tokio::signal;

/// Which signal started the shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    CtrlC,
    Terminate,
}

impl ShutdownReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CtrlC => "ctrl_c",
            ShutdownReason::Terminate => "terminate",
        }
    }
}

/// Resolve once the process is asked to stop.
///
/// A handler that fails to install is logged and never fires.
pub async fn wait_for_signal() -> ShutdownReason {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
            ShutdownReason::CtrlC
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
            ShutdownReason::Terminate
        }
    }
}
