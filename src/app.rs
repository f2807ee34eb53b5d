//! Application assembly and lifecycle: load config, build state, serve HTTP,
//! and shut down cleanly on a signal.

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use figment::providers::Env;
use figment::value::UncasedStr;
use figment::Figment;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::core::catalog::memory::InMemorySectionRepository;
use crate::state::AppState;
use crate::web::create_router;

/// The running application: configuration plus the shared state every
/// request handler closes over.
pub struct App {
    config: Config,
    app_state: AppState,
}

impl App {
    /// Build the application: load configuration and seed the catalog
    /// collaborator.
    ///
    /// A real deployment would inject a persistence-backed
    /// [`crate::core::catalog::SectionRepository`] here instead of the
    /// in-memory demo catalog; the core treats both identically (§4.1).
    pub async fn new(port_override: Option<u16>) -> Result<Self, anyhow::Error> {
        let mut config: Config = Figment::new()
            .merge(Env::raw().map(|k| {
                if k == UncasedStr::new("RAILWAY_DEPLOYMENT_DRAINING_SECONDS") {
                    "SHUTDOWN_TIMEOUT".into()
                } else {
                    k.into()
                }
            }))
            .extract()
            .context("failed to load config")?;

        if let Some(port) = port_override {
            config.port = port;
        }

        let repo: Arc<dyn crate::core::catalog::SectionRepository> =
            Arc::new(InMemorySectionRepository::demo_catalog());

        let app_state = AppState::new(
            repo,
            config.search_deadline(),
            config.default_k,
            config.max_k,
        );

        Ok(App { config, app_state })
    }

    /// Bind the HTTP listener and serve until a shutdown signal arrives,
    /// forcing an exit if in-flight connections haven't drained within
    /// `config.shutdown_timeout()`.
    pub async fn run(self) -> ExitCode {
        let shutdown_timeout = self.config.shutdown_timeout();
        let app = create_router(self.app_state);
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));

        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!(error = %e, %addr, "failed to bind web server");
                return ExitCode::FAILURE;
            }
        };
        info!(address = %addr, "web server listening");

        let serve = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        tokio::select! {
            result = serve => {
                if let Err(e) = result {
                    tracing::error!(error = %e, "web server exited with an error");
                    return ExitCode::FAILURE;
                }
                info!("web server stopped");
                ExitCode::SUCCESS
            }
            _ = force_shutdown_deadline(shutdown_timeout) => {
                warn!(timeout = ?shutdown_timeout, "graceful shutdown window elapsed, forcing exit");
                ExitCode::FAILURE
            }
        }
    }
}

/// Waits for a shutdown signal, then bounds how long in-flight connections
/// get to drain before the process is forced to exit.
async fn force_shutdown_deadline(timeout: Duration) {
    shutdown_signal().await;
    tokio::time::sleep(timeout).await;
}

/// Waits for Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C signal handler");
        info!("received ctrl+c, gracefully shutting down...");
    };

    #[cfg(unix)]
    let sigterm = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm_stream =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM signal handler");
        sigterm_stream.recv().await;
        info!("received SIGTERM, gracefully shutting down...");
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = sigterm => {}
    }
}
