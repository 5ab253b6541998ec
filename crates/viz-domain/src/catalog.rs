use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Clave del bloque de metadatos orientado a visualización dentro de una
/// entrada del catálogo (`metadata.viz.layer`, `metadata.viz.preview_args`).
pub const VIZ_METADATA_KEY: &str = "viz";

/// Documento de catálogo del proyecto: capas, datasets y parámetros.
///
/// Acepta dos esquemas de capas a la vez:
/// - mapa plano `layers: { capa: [nombres...] }`
/// - por dataset, `datasets.<nombre>.metadata.viz.layer`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSpec {
    #[serde(default)]
    layers: IndexMap<String, Vec<String>>,
    #[serde(default)]
    datasets: IndexMap<String, DatasetEntry>,
    #[serde(default)]
    parameters: Value,
}

/// Entrada individual del catálogo para un dataset declarado.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    dataset_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filepath: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
}

impl CatalogSpec {
    pub fn new(layers: IndexMap<String, Vec<String>>, datasets: IndexMap<String, DatasetEntry>, parameters: Value) -> Self {
        CatalogSpec { layers, datasets, parameters }
    }

    /// Búsqueda exacta por nombre declarado (sin normalizar sufijos).
    pub fn entry(&self, name: &str) -> Option<&DatasetEntry> {
        self.datasets.get(name)
    }

    pub fn dataset_names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    /// Capa según el esquema plano, si el nombre aparece listado en alguna.
    pub fn flat_layer_of(&self, name: &str) -> Option<&str> {
        self.layers
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == name))
            .map(|(layer, _)| layer.as_str())
    }

    pub fn parameters(&self) -> &Value {
        &self.parameters
    }

    /// Reemplaza el objeto de parámetros completo (usado por las sobrescrituras
    /// de línea de comandos, que ya llegan fusionadas).
    pub fn set_parameters(&mut self, parameters: Value) {
        self.parameters = parameters;
    }
}

impl DatasetEntry {
    pub fn new(dataset_type: Option<String>, filepath: Option<String>, metadata: Option<Value>) -> Self {
        DatasetEntry { dataset_type, filepath, metadata }
    }

    pub fn dataset_type(&self) -> Option<&str> { self.dataset_type.as_deref() }
    pub fn filepath(&self) -> Option<&str> { self.filepath.as_deref() }
    pub fn metadata(&self) -> Option<&Value> { self.metadata.as_ref() }

    /// Bloque `metadata.viz` completo, si existe y es un objeto.
    pub fn viz_block(&self) -> Option<&Value> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get(VIZ_METADATA_KEY))
            .filter(|v| v.is_object())
    }
}
