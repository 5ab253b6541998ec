//! Estado compartido de la API.
//!
//! El registro del grafo se publica detrás de un `RwLock<Arc<_>>`: las
//! peticiones clonan el `Arc` y trabajan sobre esa instantánea, y la
//! recarga automática lo reemplaza entero sin tocar a los lectores.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use viz_adapters::{EventSource, PreviewLoader};
use viz_core::GraphRegistry;

pub struct ApiState {
    registry: RwLock<Arc<GraphRegistry>>,
    events: Arc<dyn EventSource>,
    preview: PreviewLoader,
    loaded_document: Option<Value>,
}

impl std::fmt::Debug for ApiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiState")
            .field("preview", &self.preview)
            .field("loaded_document", &self.loaded_document)
            .finish_non_exhaustive()
    }
}

impl ApiState {
    pub fn new(registry: GraphRegistry, events: Arc<dyn EventSource>, preview: PreviewLoader) -> Self {
        ApiState {
            registry: RwLock::new(Arc::new(registry)),
            events,
            preview,
            loaded_document: None,
        }
    }

    /// Documento previamente guardado que sustituye a la ingesta: mientras
    /// esté presente, la respuesta principal se sirve tal cual de aquí.
    pub fn with_loaded_document(mut self, document: Option<Value>) -> Self {
        self.loaded_document = document;
        self
    }

    /// Instantánea actual del registro.
    pub async fn registry(&self) -> Arc<GraphRegistry> {
        self.registry.read().await.clone()
    }

    /// Publica un registro recién ingerido (recarga automática).
    pub async fn replace_registry(&self, registry: GraphRegistry) {
        *self.registry.write().await = Arc::new(registry);
    }

    pub fn events(&self) -> &dyn EventSource {
        self.events.as_ref()
    }

    pub fn preview(&self) -> &PreviewLoader {
        &self.preview
    }

    pub fn loaded_document(&self) -> Option<&Value> {
        self.loaded_document.as_ref()
    }
}
