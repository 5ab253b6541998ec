//! Tipos de la proyección de ejecución: eventos crudos del runtime y el
//! `RunStatus` agregado que sirve la API.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::constants::DEFAULT_RUN_ID;

/// Etiquetas de evento reconocidas en `events.json`. Cualquier etiqueta
/// desconocida se conserva como `Unknown` y se ignora al transformar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEventKind {
    BeforePipelineRun,
    AfterPipelineRun,
    OnPipelineError,
    AfterNodeRun,
    OnNodeError,
    AfterDatasetLoaded,
    AfterDatasetSaved,
    #[serde(other)]
    Unknown,
}

/// Registro crudo de un evento; todos los campos salvo la etiqueta son
/// opcionales y tolerantes al tipo (`duration_sec` y `size_bytes` llegan
/// como número o como string según el emisor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
    pub event: RunEventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_sec: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

impl RunEvent {
    pub fn new(event: RunEventKind) -> Self {
        RunEvent {
            event,
            timestamp: None,
            node_id: None,
            node: None,
            dataset: None,
            duration_sec: None,
            size_bytes: None,
            status: None,
            error: None,
            traceback: None,
            operation: None,
        }
    }
}

/// Estado terminal de pipeline o tarea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Successful,
    Failed,
}

/// Disponibilidad de un dataset tras la ejecución.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetState {
    Available,
    Missing,
}

/// Detalle de error adjunto a pipeline, tarea o dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunErrorInfo {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_node: Option<String>,
}

impl RunErrorInfo {
    pub fn new(message: String) -> Self {
        RunErrorInfo { message, traceback: None, operation: None, error_node: None }
    }
}

/// Bloque agregado de la ejecución completa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRunInfo {
    pub run_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub duration_sec: f64,
    pub status: RunState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RunErrorInfo>,
}

impl Default for PipelineRunInfo {
    fn default() -> Self {
        PipelineRunInfo {
            run_id: DEFAULT_RUN_ID.to_string(),
            start_time: None,
            end_time: None,
            duration_sec: 0.0,
            status: RunState::Successful,
            error: None,
        }
    }
}

/// Resultado por tarea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRunInfo {
    pub status: RunState,
    pub duration_sec: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RunErrorInfo>,
}

impl Default for NodeRunInfo {
    fn default() -> Self {
        NodeRunInfo { status: RunState::Successful, duration_sec: 0.0, error: None }
    }
}

/// Resultado por dataset. `size_bytes` ausente serializa como `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRunInfo {
    pub name: String,
    #[serde(default, serialize_with = "serialize_size_bytes")]
    pub size_bytes: Option<u64>,
    pub status: DatasetState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RunErrorInfo>,
}

impl DatasetRunInfo {
    pub fn new(name: String) -> Self {
        DatasetRunInfo { name, size_bytes: None, status: DatasetState::Available, error: None }
    }
}

fn serialize_size_bytes<S>(size: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(size.unwrap_or(0))
}

/// Raíz de la proyección de eventos; los mapas conservan el orden en que la
/// pasada fue descubriendo cada tarea y dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunStatus {
    pub nodes: IndexMap<String, NodeRunInfo>,
    pub datasets: IndexMap<String, DatasetRunInfo>,
    pub pipeline: PipelineRunInfo,
}
