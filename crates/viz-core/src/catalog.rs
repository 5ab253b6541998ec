//! Abstracción del catálogo de datasets que consulta el grafo.
//!
//! El grafo nunca lee archivos por sí mismo: todo lo que sabe de un dataset
//! (tipo, capa, metadatos de visualización) llega a través de este trait.
//! `InMemoryCatalog` es la implementación de referencia para pruebas.

use std::collections::HashMap;

use serde_json::Value;

use viz_domain::DatasetDescriptor;

use crate::errors::GraphError;
use crate::ident;

/// Fuente de descriptores de datasets y de parámetros del proyecto.
pub trait Catalog: Send + Sync {
    /// Descriptor completo para un nombre declarado (puede incluir `@variante`).
    fn resolve(&self, name: &str) -> Result<DatasetDescriptor, GraphError>;

    /// Capa asignada al nombre base, si el catálogo la conoce.
    fn layer_for(&self, base_name: &str) -> Option<String>;

    /// Valor de un parámetro (`parameters` o `params:<ruta>`).
    fn parameter_value(&self, name: &str) -> Option<Value>;

    /// Un nombre declarado es un nodo de parámetros, no un dataset.
    fn is_parameter(&self, name: &str) -> bool {
        ident::is_parameter_name(name)
    }
}

/// Catálogo en memoria: descriptores y capas precargados, sin E/S.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    descriptors: HashMap<String, DatasetDescriptor>,
    layers: HashMap<String, String>,
    parameters: Value,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            descriptors: HashMap::new(),
            layers: HashMap::new(),
            parameters: Value::Null,
        }
    }

    pub fn with_descriptor(mut self, name: &str, descriptor: DatasetDescriptor) -> Self {
        self.descriptors.insert(name.to_string(), descriptor);
        self
    }

    pub fn with_layer(mut self, base_name: &str, layer: &str) -> Self {
        self.layers.insert(base_name.to_string(), layer.to_string());
        self
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = parameters;
        self
    }
}

impl Catalog for InMemoryCatalog {
    fn resolve(&self, name: &str) -> Result<DatasetDescriptor, GraphError> {
        self.descriptors
            .get(name)
            .cloned()
            .ok_or_else(|| GraphError::DatasetNotFound(name.to_string()))
    }

    fn layer_for(&self, base_name: &str) -> Option<String> {
        self.layers.get(base_name).cloned()
    }

    fn parameter_value(&self, name: &str) -> Option<Value> {
        crate::params::parameter_value(&self.parameters, name)
    }
}
