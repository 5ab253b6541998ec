//! Estado agregado del grafo tras una pasada de ingesta.
//!
//! El registro es propiedad de la aplicación: la ingesta lo muta una sola vez
//! y las consultas posteriores solo leen. Una recarga construye un registro
//! nuevo y lo intercambia de forma atómica en lugar de mutar este.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::catalog::Catalog;
use crate::graph::modular::ModularTree;
use crate::repo::{EdgeRepository, NodeRepository, RegisteredPipelineRepository, TagRepository};

pub struct GraphRegistry {
    pub(crate) catalog: Arc<dyn Catalog>,
    pub(crate) nodes: NodeRepository,
    pub(crate) edges: EdgeRepository,
    pub(crate) tags: TagRepository,
    pub(crate) pipelines: RegisteredPipelineRepository,
    pub(crate) modular_trees: IndexMap<String, ModularTree>,
    pub(crate) sorted_layers: IndexMap<String, Vec<String>>,
    pub(crate) stats: HashMap<String, Value>,
    pub(crate) styles: HashMap<String, Value>,
}

impl GraphRegistry {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        GraphRegistry {
            catalog,
            nodes: NodeRepository::new(),
            edges: EdgeRepository::new(),
            tags: TagRepository::new(),
            pipelines: RegisteredPipelineRepository::new(),
            modular_trees: IndexMap::new(),
            sorted_layers: IndexMap::new(),
            stats: HashMap::new(),
            styles: HashMap::new(),
        }
    }

    /// Adjunta los archivos laterales (`stats.json` y `styles.json`) ya
    /// deserializados; deben llegar antes de la ingesta para que los nodos
    /// los incorporen al crearse.
    pub fn with_sidecars(
        mut self,
        stats: HashMap<String, Value>,
        styles: HashMap<String, Value>,
    ) -> Self {
        self.stats = stats;
        self.styles = styles;
        self
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    pub fn nodes(&self) -> &NodeRepository {
        &self.nodes
    }

    pub fn edges(&self) -> &EdgeRepository {
        &self.edges
    }

    pub fn tags(&self) -> &TagRepository {
        &self.tags
    }

    pub fn pipelines(&self) -> &RegisteredPipelineRepository {
        &self.pipelines
    }

    pub fn modular_tree(&self, pipeline_id: &str) -> Option<&ModularTree> {
        self.modular_trees.get(pipeline_id)
    }

    /// Orden de capas del pipeline; vacío si hubo ciclo o no hay capas.
    pub fn sorted_layers_for(&self, pipeline_id: &str) -> &[String] {
        self.sorted_layers.get(pipeline_id).map(Vec::as_slice).unwrap_or(&[])
    }
}
