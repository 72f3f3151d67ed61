//! Mock service running on a background thread
//!
//! The server owns its tokio runtime, so blocking clients (which must not be
//! driven from inside a runtime) can talk to it from plain `#[test]` functions.

use std::io;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::thread::JoinHandle;

use axum::Router;
use axum::http::{StatusCode, header};
use tokio::runtime::{Handle, Runtime};
use tokio::sync::oneshot;

use crate::api;
use crate::state::AppState;
use crate::store::DeletionRecord;

/// Running mock zones service bound to `127.0.0.1` on a random port
#[derive(Debug)]
pub struct MockServer {
    addr: SocketAddr,
    state: Arc<AppState>,
    runtime: Handle,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl MockServer {
    /// Start without authentication
    pub fn start() -> io::Result<Self> {
        Self::start_with_state(AppState::new(None))
    }

    /// Start requiring `Authorization: Bearer <token>`
    pub fn start_with_token(token: impl Into<String>) -> io::Result<Self> {
        Self::start_with_state(AppState::new(Some(token.into())))
    }

    /// Start a server that answers every request with `status` and the JSON
    /// `body` verbatim, bypassing the zone store.
    pub fn start_canned(status: StatusCode, body: impl Into<String>) -> io::Result<Self> {
        let body = body.into();
        let app = Router::new().fallback(move || {
            let body = body.clone();
            async move { (status, [(header::CONTENT_TYPE, "application/json")], body) }
        });
        Self::start_app(Arc::new(AppState::new(None)), app)
    }

    fn start_with_state(state: AppState) -> io::Result<Self> {
        let state = Arc::new(state);
        let app = api::router(state.clone());
        Self::start_app(state, app)
    }

    fn start_app(state: Arc<AppState>, app: Router) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("zone-mock-worker")
            .enable_all()
            .build()?;
        let handle = runtime.handle().clone();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let thread = std::thread::Builder::new()
            .name("zone-mock".to_string())
            .spawn(move || serve(runtime, listener, app, shutdown_rx))?;

        tracing::info!(%addr, "zone-mock started");
        Ok(Self {
            addr,
            state,
            runtime: handle,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL to configure clients with
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Every successful deletion so far, oldest first
    pub fn deletions(&self) -> Vec<DeletionRecord> {
        self.runtime.block_on(self.state.store.deletions())
    }

    /// Number of live zones in a project
    pub fn zone_count(&self, project_key: &str) -> usize {
        self.runtime.block_on(self.state.store.count(project_key))
    }
}

fn serve(
    runtime: Runtime,
    listener: TcpListener,
    app: Router,
    shutdown: oneshot::Receiver<()>,
) {
    runtime.block_on(async move {
        let listener = match tokio::net::TcpListener::from_std(listener) {
            Ok(l) => l,
            Err(e) => {
                tracing::error!("Failed to register listener: {e}");
                return;
            }
        };

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown.await;
            })
            .await;
        if let Err(e) = result {
            tracing::error!("zone-mock server error: {e}");
        }
    });
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            tracing::warn!("zone-mock server thread panicked");
        }
    }
}
