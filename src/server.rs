use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use log::{error, info};
use prometheus::{Encoder, Registry, TextEncoder};
use tokio::net::TcpListener;

use crate::error::{Context, Result};

/// Shared state handed to the metrics handler.
pub struct AppState {
    pub registry: Registry,
    pub telemetry_path: String,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let telemetry_path = state.telemetry_path.clone();
    Router::new()
        .route("/", get(landing_page))
        .route(&telemetry_path, get(metrics_handler))
        .with_state(state)
}

async fn landing_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(format!(
        r#"<html>
<head><title>StockPrice Exporter</title></head>
<body>
<h1>StockPrice Exporter</h1>
<p><a href="{}">Metrics</a></p>
</body>
</html>"#,
        state.telemetry_path
    ))
}

async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    // Collection blocks on the upstream request.
    let gathered = tokio::task::spawn_blocking(move || encode_metrics(&state.registry)).await;

    match gathered {
        Ok(Ok((content_type, body))) => {
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Ok(Err(err)) => {
            error!("Failed to encode metrics: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
        Err(err) => {
            error!("Metrics collection task failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

fn encode_metrics(registry: &Registry) -> Result<(String, Vec<u8>)> {
    let families = registry.gather();
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&families, &mut buffer)?;
    Ok((encoder.format_type().to_string(), buffer))
}

/// Serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(
        "Listening on {}, metrics at {}",
        addr, state.telemetry_path
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
}
