//! Preview server lifecycle.
//!
//! [`PreviewServer::start`] binds the listener, arms the idle timer and
//! serves until the timer fires. Expiry closes the server gracefully and
//! then ends the process through [`ProcessExit`]: status 0 after a clean
//! close, 1 when the close fails or outlives the grace period.

mod exit;
pub mod handlers;
mod idle;
mod state;

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::{build_config, ServerConfig, ServerMode};
use crate::error::{PreviewError, Result};

pub use exit::{ProcessExit, StdExit};
pub use idle::IdleTimer;
pub use state::{router, AppState, MODULE_PREFIX};

/// Idle timeout used when the caller gives none.
pub const DEFAULT_IDLE_TIMEOUT_MINUTES: u64 = 30;
/// Upper bound on the graceful close after idle expiry.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Runtime options that are not part of the served configuration.
#[derive(Clone)]
pub struct ServerOptions {
    pub idle_timeout: Duration,
    pub grace_period: Duration,
    pub exit: Arc<dyn ProcessExit>,
}

impl ServerOptions {
    pub fn with_idle_minutes(minutes: u64) -> Self {
        Self {
            idle_timeout: Duration::from_secs(minutes.saturating_mul(60)),
            ..Self::default()
        }
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn grace_period(mut self, grace: Duration) -> Self {
        self.grace_period = grace;
        self
    }

    pub fn exit(mut self, exit: impl ProcessExit + 'static) -> Self {
        self.exit = Arc::new(exit);
        self
    }
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_MINUTES * 60),
            grace_period: DEFAULT_GRACE_PERIOD,
            exit: Arc::new(StdExit),
        }
    }
}

impl std::fmt::Debug for ServerOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerOptions")
            .field("idle_timeout", &self.idle_timeout)
            .field("grace_period", &self.grace_period)
            .finish_non_exhaustive()
    }
}

/// A running preview server.
#[derive(Debug)]
pub struct ServerHandle {
    port: u16,
    mode: ServerMode,
    supervisor: JoinHandle<i32>,
}

impl ServerHandle {
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Port rendered for display.
    pub fn port_string(&self) -> String {
        self.port.to_string()
    }

    pub fn mode(&self) -> ServerMode {
        self.mode
    }

    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    /// Wait for idle shutdown and return the exit status that was reported.
    pub async fn wait(self) -> i32 {
        self.supervisor.await.unwrap_or(1)
    }
}

/// Preview server
pub struct PreviewServer;

impl PreviewServer {
    /// Start serving `config`. Resolves once the listener is bound.
    pub async fn start(config: ServerConfig, options: ServerOptions) -> Result<ServerHandle> {
        config.component.validate()?;
        let port = config.port;
        let mode = config.server_mode;
        let state = AppState::new(config)?;

        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| PreviewError::Bind { port, source })?;
        let port = listener.local_addr().map(|a| a.port()).unwrap_or(port);
        info!("Preview server listening on http://localhost:{} ({} mode)", port, mode);

        let shutdown = CancellationToken::new();
        let timer = {
            let shutdown = shutdown.clone();
            let idle_timeout = options.idle_timeout;
            IdleTimer::arm(idle_timeout, move || {
                warn!("No requests for {:?}, shutting down", idle_timeout);
                shutdown.cancel();
            })
        };

        let app = router(Arc::new(state.with_idle_timer(timer.clone())));
        let serve = tokio::spawn({
            let shutdown = shutdown.clone();
            async move {
                axum::serve(listener, app)
                    .with_graceful_shutdown(shutdown.cancelled_owned())
                    .await
            }
        });

        let supervisor = tokio::spawn(async move {
            let code = supervise(serve, shutdown, options.grace_period).await;
            timer.cancel();
            options.exit.exit(code);
            code
        });

        Ok(ServerHandle {
            port,
            mode,
            supervisor,
        })
    }
}

/// Exit status for the server task. A serve error ends the process too.
async fn supervise(
    mut serve: JoinHandle<std::io::Result<()>>,
    shutdown: CancellationToken,
    grace: Duration,
) -> i32 {
    let outcome = tokio::select! {
        outcome = &mut serve => outcome,
        () = shutdown.cancelled() => match tokio::time::timeout(grace, &mut serve).await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("Preview server did not close within {:?}", grace);
                serve.abort();
                return 1;
            },
        },
    };

    match outcome {
        Ok(Ok(())) => {
            info!("Preview server closed");
            0
        },
        Ok(Err(err)) => {
            error!("Preview server failed to close: {}", err);
            1
        },
        Err(err) => {
            error!("Preview server task failed: {}", err);
            1
        },
    }
}

/// Build the configuration for `component` and start serving it.
///
/// Returns the bound port. The server keeps running in the background
/// and ends the process after `idle_timeout_minutes` without requests.
pub async fn start_server(
    component: &str,
    project_dir: &Path,
    idle_timeout_minutes: u64,
) -> Result<String> {
    let config = build_config(component, project_dir, None)?;
    let handle =
        PreviewServer::start(config, ServerOptions::with_idle_minutes(idle_timeout_minutes))
            .await?;
    Ok(handle.port_string())
}
