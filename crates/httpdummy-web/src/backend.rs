//! The web backend: config + router, bound to a listen address.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use httpdummy_core::error::{HttpDummyError, Result};
use httpdummy_core::metrics::Registry;

use crate::{app_state::AppState, config::Config, router};

pub struct WebBackend {
    cfg: Config,
    router: Router,
}

impl WebBackend {
    /// Build state and router. Config, template and metric registration
    /// errors surface here, before anything is bound.
    pub fn new(cfg: Config, registry: Arc<Registry>) -> Result<Self> {
        let state = AppState::new(cfg.clone(), registry)?;
        Ok(Self {
            cfg,
            router: router::build_router(state),
        })
    }

    /// Bind and serve until Ctrl-C / SIGTERM.
    pub async fn run(self) -> Result<()> {
        let addr = self.cfg.listen_addr.clone();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| HttpDummyError::Bind { addr: addr.clone(), source })?;
        let local = listener.local_addr().map(|a| a.to_string()).unwrap_or(addr);
        tracing::info!("listening on {local}");

        axum::serve(
            listener,
            self.router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| HttpDummyError::Internal(format!("server failed: {e}")))
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
