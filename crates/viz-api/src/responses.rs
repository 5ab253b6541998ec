//! Documentos de respuesta de la API.
//!
//! `GraphResponse` es la forma serializada de una `GraphSelection`: los
//! nodos conservan el orden de inserción del registro, los conjuntos salen
//! ordenados por venir de `BTreeSet`, y el árbol modular se emite como un
//! objeto id → entrada con `__root__` en primer lugar.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use viz_core::{
    GraphEdge, GraphNode, GraphSelection, ModularPipelineNode, NodeType, RegisteredPipeline, Tag,
};

#[derive(Debug, Clone, Serialize)]
pub struct GraphResponse {
    pub nodes: Vec<NodeEntry>,
    pub edges: Vec<GraphEdge>,
    pub tags: Vec<Tag>,
    pub layers: Vec<String>,
    pub pipelines: Vec<RegisteredPipeline>,
    pub modular_pipelines: IndexMap<String, ModularPipelineEntry>,
    pub selected_pipeline: String,
}

/// Nodo aplanado para el documento principal; los campos específicos de
/// datasets solo aparecen cuando la variante los aporta.
#[derive(Debug, Clone, Serialize)]
pub struct NodeEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub tags: BTreeSet<String>,
    pub pipelines: BTreeSet<String>,
    pub modular_pipelines: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_free_input: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viz_metadata: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModularPipelineEntry {
    pub id: String,
    pub name: String,
    pub tags: BTreeSet<String>,
    pub pipelines: BTreeSet<String>,
    pub inputs: BTreeSet<String>,
    pub outputs: BTreeSet<String>,
    pub children: Vec<ChildEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChildEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
}

impl GraphResponse {
    pub fn from_selection(selection: &GraphSelection<'_>) -> Self {
        let modular_pipelines = selection
            .modular_pipelines
            .map(|tree| {
                tree.iter()
                    .map(|(id, mp)| (id.clone(), ModularPipelineEntry::from_node(mp)))
                    .collect()
            })
            .unwrap_or_default();
        GraphResponse {
            nodes: selection.nodes.iter().map(|node| NodeEntry::from_node(node)).collect(),
            edges: selection.edges.iter().map(|edge| (*edge).clone()).collect(),
            tags: selection.tags.iter().map(|tag| (*tag).clone()).collect(),
            layers: selection.layers.to_vec(),
            pipelines: selection.pipelines.iter().map(|p| (*p).clone()).collect(),
            modular_pipelines,
            selected_pipeline: selection.selected_pipeline.clone(),
        }
    }

    /// Documento bien formado pero vacío, la respuesta ante un fallo total
    /// de ingesta.
    pub fn empty() -> Self {
        GraphResponse {
            nodes: Vec::new(),
            edges: Vec::new(),
            tags: Vec::new(),
            layers: Vec::new(),
            pipelines: Vec::new(),
            modular_pipelines: IndexMap::new(),
            selected_pipeline: String::new(),
        }
    }
}

impl NodeEntry {
    pub fn from_node(node: &GraphNode) -> Self {
        let head = node.head();
        let (stats, viz_metadata) = match node {
            GraphNode::Data(n) => (n.stats.clone(), n.viz_metadata.clone()),
            GraphNode::TranscodedData(n) => (n.stats.clone(), n.viz_metadata.clone()),
            _ => (None, None),
        };
        let dataset_type = match node {
            GraphNode::Data(n) => n.dataset_type.clone(),
            GraphNode::TranscodedData(n) => n.original_type().map(str::to_string),
            _ => None,
        };
        NodeEntry {
            id: head.id.clone(),
            name: head.name.clone(),
            node_type: node.node_type(),
            tags: head.tags.clone(),
            pipelines: head.pipelines.clone(),
            modular_pipelines: head.modular_pipelines.clone(),
            layer: node.layer().map(str::to_string),
            dataset_type,
            is_free_input: node.is_free_input(),
            stats,
            viz_metadata,
        }
    }
}

impl ModularPipelineEntry {
    pub fn from_node(mp: &ModularPipelineNode) -> Self {
        ModularPipelineEntry {
            id: mp.id.clone(),
            name: mp.name.clone(),
            tags: mp.tags.clone(),
            pipelines: mp.pipelines.clone(),
            inputs: mp.inputs(),
            outputs: mp.outputs(),
            children: mp
                .children
                .iter()
                .map(|child| ChildEntry { id: child.id.clone(), node_type: child.node_type })
                .collect(),
        }
    }
}
