// viz-adapters error types

use thiserror::Error;

/// Errores de la capa de adaptación.
///
/// Cubren la lectura de ficheros del proyecto, el parseo de sus
/// contenidos y la previsualización de datasets. La resolución de
/// nombres contra el catálogo viaja como `GraphError` en viz-core.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("contenido malformado en {file}: {detail}")]
    InputMalformed { file: String, detail: String },

    #[error("error de E/S sobre {file}: {source}")]
    Filesystem {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("fallo de previsualización: {0}")]
    PreviewFailure(String),
}

impl AdapterError {
    /// Construye un `InputMalformed` a partir de un error de serde.
    pub fn malformed(file: impl Into<String>, err: serde_json::Error) -> Self {
        AdapterError::InputMalformed {
            file: file.into(),
            detail: err.to_string(),
        }
    }

    /// Construye un `Filesystem` conservando el error original.
    pub fn io(file: impl Into<String>, err: std::io::Error) -> Self {
        AdapterError::Filesystem {
            file: file.into(),
            source: err,
        }
    }
}
