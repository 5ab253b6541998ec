//! Manejadores de los cuatro endpoints de la API.
//!
//! La política de errores distingue entre fallo de ingesta (se absorbe y se
//! sirve el documento vacío) y búsqueda explícita por id (404 con mensaje).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value};

use viz_core::{transform_events, NodeMetadata, RunStatus};

use crate::error::ApiError;
use crate::responses::GraphResponse;
use crate::state::ApiState;

/// `GET /api/main`: el grafo del pipeline por defecto. Si el proceso arrancó
/// con un documento cargado de disco, se sirve ese documento tal cual.
pub async fn get_main(State(state): State<Arc<ApiState>>) -> Response {
    if let Some(document) = state.loaded_document() {
        return Json(document.clone()).into_response();
    }
    let registry = state.registry().await;
    let response = match registry.default_pipeline_id() {
        Some(pipeline_id) => match registry.selection(pipeline_id) {
            Ok(selection) => GraphResponse::from_selection(&selection),
            Err(err) => {
                log::warn!("no se pudo ensamblar el pipeline por defecto: {err}");
                GraphResponse::empty()
            }
        },
        None => GraphResponse::empty(),
    };
    Json(response).into_response()
}

/// `GET /api/pipelines/{pipeline_id}`: el grafo de un pipeline concreto.
pub async fn get_pipeline(
    State(state): State<Arc<ApiState>>,
    Path(pipeline_id): Path<String>,
) -> Result<Json<GraphResponse>, ApiError> {
    let registry = state.registry().await;
    let selection = registry
        .selection(&pipeline_id)
        .map_err(|err| ApiError::not_found(err.to_string()))?;
    Ok(Json(GraphResponse::from_selection(&selection)))
}

/// `GET /api/nodes/{node_id}`: metadatos por variante. Un nodo sin nada que
/// contar responde `{}`; a los datasets con previsualización habilitada se
/// les adjunta el bloque `preview`.
pub async fn get_node(
    State(state): State<Arc<ApiState>>,
    Path(node_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let registry = state.registry().await;
    let metadata = registry
        .node_metadata(&node_id)
        .map_err(|err| ApiError::not_found(err.to_string()))?;
    if metadata.is_empty() {
        return Ok(Json(Value::Object(Map::new())));
    }
    let mut body = match serde_json::to_value(&metadata) {
        Ok(body) => body,
        Err(err) => {
            log::warn!("metadatos no serializables para '{node_id}': {err}");
            Value::Object(Map::new())
        }
    };
    if let NodeMetadata::Data(data) = &metadata {
        let preview = state
            .preview()
            .preview(&data.name, data.filepath.as_deref(), data.preview_rows)
            .await;
        if let (Some(preview), Value::Object(map)) = (preview, &mut body) {
            map.insert("preview".to_string(), preview);
        }
    }
    Ok(Json(body))
}

/// `GET /api/run-status`: proyección de la última ejecución. Una fuente de
/// eventos rota degrada al estado por defecto, con su `run_id` centinela.
pub async fn get_run_status(State(state): State<Arc<ApiState>>) -> Json<RunStatus> {
    match state.events().load_events().await {
        Ok(events) => Json(transform_events(&events)),
        Err(err) => {
            log::warn!("no se pudieron leer los eventos de ejecución: {err}");
            Json(RunStatus::default())
        }
    }
}
