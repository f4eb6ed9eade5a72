//! Local static file server.
//!
//! Serves the gallery root over HTTP so the generated pages can be browsed
//! at `http://127.0.0.1:<port>/gallerize.html`. There is no custom protocol
//! logic: files are served by `tower-http`'s [`ServeDir`], which guesses the
//! content type from the extension and answers 404 for anything missing.
//!
//! - A directory URL ending in `/` (including `/` itself) redirects to that
//!   directory's `gallerize.html`.
//! - Directories are never listed and never mapped to `index.html`; the
//!   generated pages are the way to browse.
//!
//! The server gets its own tokio runtime in [`run`]; the rest of the crate
//! stays synchronous.

use crate::naming::INDEX_FILE_NAME;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Redirect, Response};
use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Could not listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the router serving `root`.
pub fn router(root: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(root).append_index_html_on_directories(false))
        .layer(middleware::from_fn(redirect_directories))
}

/// Send `…/` to `…/gallerize.html`. A missing directory then 404s on the page.
async fn redirect_directories(request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path();
    if path.ends_with('/') {
        return Redirect::temporary(&format!("{path}{INDEX_FILE_NAME}")).into_response();
    }
    next.run(request).await
}

/// Bind a listener, reporting the address on failure (e.g. port in use).
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServeError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })
}

/// Serve `root` on an already bound listener until `shutdown` completes.
pub async fn serve<F>(listener: TcpListener, root: &Path, shutdown: F) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(root))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Browsable URL of the root index page for a listening address.
///
/// Wildcard addresses are shown as loopback so the URL can be clicked.
pub fn index_url(addr: SocketAddr) -> String {
    let host = match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    format!(
        "http://{}/{}",
        SocketAddr::new(host, addr.port()),
        INDEX_FILE_NAME
    )
}

/// Serve `root` on `addr` until Ctrl-C.
///
/// Blocks the calling thread. `on_ready` receives the browsable URL once the
/// listener is bound.
pub fn run(root: &Path, addr: SocketAddr, on_ready: impl FnOnce(&str)) -> Result<(), ServeError> {
    if !root.is_dir() {
        return Err(ServeError::NotADirectory(root.to_path_buf()));
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let listener = bind(addr).await?;
        let local = listener.local_addr()?;
        info!(addr = %local, root = %root.display(), "listening");
        on_ready(&index_url(local));
        serve(listener, root, shutdown_signal()).await?;
        info!("server stopped");
        Ok(())
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler the server runs until the process is killed
        warn!(error = %e, "could not install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}
