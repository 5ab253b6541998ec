use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::DatasetEntry;

/// Vista resuelta de un dataset: el registro de capacidades que el grafo
/// consulta sin volver a mirar el documento de catálogo.
///
/// Un dataset sin entrada en el catálogo se representa con el marcador en
/// memoria (`placeholder`), que no aporta tipo ni ruta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    name: String,
    dataset_type: Option<String>,
    filepath: Option<String>,
    layer: Option<String>,
    viz_metadata: Option<Value>,
    preview: Option<PreviewArgs>,
}

/// Argumentos de previsualización declarados en `metadata.viz.preview_args`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreviewArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nrows: Option<usize>,
}

impl DatasetDescriptor {
    pub fn from_entry(name: &str, entry: &DatasetEntry) -> Self {
        let viz = entry.viz_block().cloned();
        let layer = viz
            .as_ref()
            .and_then(|v| v.get("layer"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let preview = viz
            .as_ref()
            .and_then(|v| v.get("preview_args"))
            .and_then(|args| serde_json::from_value::<PreviewArgs>(args.clone()).ok());
        DatasetDescriptor {
            name: name.to_string(),
            dataset_type: entry.dataset_type().map(str::to_string),
            filepath: entry.filepath().map(str::to_string),
            layer,
            viz_metadata: viz,
            preview,
        }
    }

    /// Marcador para datasets sin entrada: viven en memoria durante la
    /// ejecución y no exponen capacidades.
    pub fn placeholder(name: &str) -> Self {
        DatasetDescriptor {
            name: name.to_string(),
            dataset_type: None,
            filepath: None,
            layer: None,
            viz_metadata: None,
            preview: None,
        }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn dataset_type(&self) -> Option<&str> { self.dataset_type.as_deref() }
    pub fn filepath(&self) -> Option<&str> { self.filepath.as_deref() }
    pub fn layer(&self) -> Option<&str> { self.layer.as_deref() }
    pub fn viz_metadata(&self) -> Option<&Value> { self.viz_metadata.as_ref() }
    pub fn preview(&self) -> Option<&PreviewArgs> { self.preview.as_ref() }

    /// Sustituye la capa resuelta (la vía del esquema plano gana solo cuando
    /// el bloque `viz` no declara ninguna).
    pub fn with_layer_fallback(mut self, layer: Option<&str>) -> Self {
        if self.layer.is_none() {
            self.layer = layer.map(str::to_string);
        }
        self
    }
}

impl PreviewArgs {
    pub fn new(nrows: Option<usize>) -> Self {
        PreviewArgs { nrows }
    }

    pub fn nrows(&self) -> Option<usize> {
        self.nrows
    }
}
