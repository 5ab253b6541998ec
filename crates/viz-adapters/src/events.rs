//! Fuentes de eventos de ejecución.
//!
//! La proyección de `/api/run-status` se recalcula en cada consulta a partir
//! de la lista cruda que entregue la fuente; aquí viven la fuente de fichero
//! (`events.json`) y una fija en memoria para pruebas.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use viz_core::RunEvent;

use crate::error::AdapterError;

#[async_trait]
pub trait EventSource: Send + Sync {
    async fn load_events(&self) -> Result<Vec<RunEvent>, AdapterError>;
}

/// Lee el fichero de eventos completo en cada consulta. La ausencia del
/// fichero significa que todavía no hubo ejecución y equivale a lista vacía.
#[derive(Debug, Clone)]
pub struct FileEventSource {
    path: PathBuf,
}

impl FileEventSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileEventSource { path: path.into() }
    }
}

#[async_trait]
impl EventSource for FileEventSource {
    async fn load_events(&self) -> Result<Vec<RunEvent>, AdapterError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(AdapterError::io(self.path.display().to_string(), err)),
        };
        serde_json::from_slice(&bytes)
            .map_err(|err| AdapterError::malformed(self.path.display().to_string(), err))
    }
}

/// Fuente fija en memoria.
#[derive(Debug, Clone, Default)]
pub struct StaticEventSource {
    events: Vec<RunEvent>,
}

impl StaticEventSource {
    pub fn new(events: Vec<RunEvent>) -> Self {
        StaticEventSource { events }
    }
}

#[async_trait]
impl EventSource for StaticEventSource {
    async fn load_events(&self) -> Result<Vec<RunEvent>, AdapterError> {
        Ok(self.events.clone())
    }
}
