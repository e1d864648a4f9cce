//! TCP transport for the REST API

use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tracing::info;

/// Serve `app` on `addr` until `shutdown` resolves
pub async fn serve_on_tcp<F>(
    addr: SocketAddr,
    app: Router,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()>,
{
    let server = axum::Server::try_bind(&addr)?;
    info!("REST API server listening on TCP {}", addr);

    server
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("REST API server stopped");
    Ok(())
}
