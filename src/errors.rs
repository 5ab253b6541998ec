//! Errores del arranque y la composición del servidor.

use thiserror::Error;

use viz_adapters::AdapterError;
use viz_core::GraphError;

#[derive(Debug, Error)]
pub enum ServeError {
    /// La combinación host/puerto no resuelve a una dirección utilizable.
    #[error("dirección de escucha inválida: {0}")]
    Address(String),

    #[error(transparent)]
    Project(#[from] AdapterError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("documento guardado ilegible en '{file}': {source}")]
    SavedDocument {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no se pudo serializar el documento principal: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no se pudo escribir '{file}': {source}")]
    WriteFile {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no se pudo leer '{file}': {source}")]
    ReadFile {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("fallo del servidor HTTP: {0}")]
    Server(#[from] std::io::Error),
}
