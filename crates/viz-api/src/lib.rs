//! viz-api: Superficie HTTP del grafo
//!
//! Este crate implementa:
//! - El router `/api/{main,pipelines/{id},nodes/{id},run-status}`
//! - La serialización del documento de grafo y de los metadatos de nodo
//! - El estado compartido con recarga atómica del registro
//! - El servidor con parada ordenada

pub mod error;
pub mod handlers;
pub mod responses;
pub mod state;

pub use error::ApiError;
pub use responses::{GraphResponse, ModularPipelineEntry, NodeEntry};
pub use state::ApiState;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

pub fn make_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/main", get(handlers::get_main))
        .route("/api/pipelines/{pipeline_id}", get(handlers::get_pipeline))
        .route("/api/nodes/{node_id}", get(handlers::get_node))
        .route("/api/run-status", get(handlers::get_run_status))
        .with_state(state)
}

/// Sirve la API en la dirección indicada hasta recibir SIGINT.
pub async fn serve(addr: SocketAddr, state: Arc<ApiState>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("API disponible en http://{addr}");
    axum::serve(listener, make_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        log::warn!("no se pudo instalar el manejador de Ctrl-C");
    }
}
