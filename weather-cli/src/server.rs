//! HTTP endpoint: `GET /weather/{city}` returns the averaged temperature.

use std::time::Instant;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use weather_core::{ProviderSet, TemperatureReport, aggregate};

/// Shared state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub providers: ProviderSet,
}

pub fn router(providers: ProviderSet) -> Router {
    Router::new()
        .route("/weather/{city}", get(weather))
        .with_state(AppState { providers })
        .layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: &str, providers: ProviderSet) -> anyhow::Result<()> {
    let listener =
        TcpListener::bind(addr).await.with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(
        address = %listener.local_addr()?,
        providers = ?providers.names(),
        "Listening for weather requests"
    );

    axum::serve(listener, router(providers))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn weather(State(state): State<AppState>, Path(city): Path<String>) -> Response {
    let begin = Instant::now();

    match aggregate(&city, &state.providers).await {
        Ok(temp) => {
            let report = TemperatureReport::new(city, temp, begin.elapsed());
            tracing::debug!(city = %report.city, temp, took = %report.took, "served temperature");
            Json(report).into_response()
        }
        Err(err) => {
            tracing::error!(city = %city, error = %err, "aggregation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
