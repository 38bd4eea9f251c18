use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum_server::Handle;

use crate::error::ServiceError;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Serves `app` until Ctrl-C or SIGTERM, then drains in-flight requests.
pub async fn serve(name: &'static str, addr: SocketAddr, app: Router) -> Result<(), ServiceError> {
    let handle: Handle<SocketAddr> = Handle::new();
    tokio::spawn(shutdown_on_signal(name, handle.clone()));
    serve_with_handle(name, addr, app, handle).await
}

/// Serves `app` until `handle` is told to shut down.
pub async fn serve_with_handle(
    name: &'static str,
    addr: SocketAddr,
    app: Router,
    handle: Handle<SocketAddr>,
) -> Result<(), ServiceError> {
    tracing::info!(service = name, %addr, "listening on http://{addr}");
    tracing::info!(service = name, "Scalar UI: http://{addr}/scalar");

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    tracing::info!(service = name, "server stopped");
    Ok(())
}

async fn shutdown_on_signal(name: &'static str, handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl-C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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

    tracing::info!(service = name, "shutdown signal received");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForecastConfig;
    use crate::routes::forecast_routes::forecast_routes;
    use crate::shared_state::ForecastState;

    #[tokio::test]
    async fn graceful_shutdown_stops_the_server() {
        let handle: Handle<SocketAddr> = Handle::new();
        let app = forecast_routes(ForecastState::new(&ForecastConfig::default()));
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let server = tokio::spawn(serve_with_handle("forecast", addr, app, handle.clone()));

        let bound = handle.listening().await;
        assert!(bound.is_some_and(|a| a.port() != 0));

        handle.graceful_shutdown(Some(Duration::from_secs(1)));
        let result = tokio::time::timeout(Duration::from_secs(5), server).await;
        assert!(matches!(result, Ok(Ok(Ok(())))));
    }
}
