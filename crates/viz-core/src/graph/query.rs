//! Proyecciones de lectura sobre el registro: la selección de un pipeline
//! completo y la vista de metadatos de un nodo individual.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::errors::GraphError;
use crate::graph::modular::ModularTree;
use crate::graph::registry::GraphRegistry;
use crate::model::{
    DataNode, GraphEdge, GraphNode, ParametersNode, RegisteredPipeline, Tag, TaskNode,
    TranscodedDataNode,
};

/// Vista ensamblada de un pipeline registrado; todo son préstamos sobre el
/// registro, la serialización corre a cargo de la capa HTTP.
pub struct GraphSelection<'a> {
    pub selected_pipeline: String,
    pub nodes: Vec<&'a GraphNode>,
    pub edges: Vec<&'a GraphEdge>,
    pub tags: Vec<&'a Tag>,
    pub layers: &'a [String],
    pub pipelines: Vec<&'a RegisteredPipeline>,
    pub modular_pipelines: Option<&'a ModularTree>,
}

/// Metadatos de un nodo, elegidos por variante.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodeMetadata {
    Task(TaskMetadata),
    Data(DataMetadata),
    Transcoded(TranscodedMetadata),
    Parameters(ParametersMetadata),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Value>,
    pub run_command: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataMetadata {
    #[serde(skip)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub dataset_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Value>,
    #[serde(skip)]
    pub preview_rows: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscodedMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_type: Option<String>,
    pub transcoded_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_command: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParametersMetadata {
    pub parameters: Value,
}

impl NodeMetadata {
    /// Un nodo sin nada que contar produce un cuerpo vacío en la API.
    pub fn is_empty(&self) -> bool {
        match self {
            NodeMetadata::Parameters(meta) => meta.parameters.is_null(),
            _ => false,
        }
    }
}

impl GraphRegistry {
    /// Pipeline seleccionado por defecto: `__default__` si existe, si no el
    /// primero registrado.
    pub fn default_pipeline_id(&self) -> Option<&str> {
        self.pipelines.default_id()
    }

    /// Ensambla la vista completa del pipeline indicado.
    pub fn selection(&self, pipeline_id: &str) -> Result<GraphSelection<'_>, GraphError> {
        let Some(members) = self.pipelines.members(pipeline_id) else {
            return Err(GraphError::PipelineNotFound(pipeline_id.to_string()));
        };
        Ok(GraphSelection {
            selected_pipeline: pipeline_id.to_string(),
            nodes: self.nodes.get_by_ids(members).collect(),
            edges: self.edges.get_by_node_ids(members).collect(),
            tags: self.tags.as_list().collect(),
            layers: self.sorted_layers_for(pipeline_id),
            pipelines: self.pipelines.as_list().collect(),
            modular_pipelines: self.modular_trees.get(pipeline_id),
        })
    }

    /// Vista de metadatos de un nodo individual.
    pub fn node_metadata(&self, node_id: &str) -> Result<NodeMetadata, GraphError> {
        let Some(node) = self.nodes.get_by_id(node_id) else {
            return Err(GraphError::NodeNotFound(node_id.to_string()));
        };
        Ok(match node {
            GraphNode::Task(task) => NodeMetadata::Task(task_metadata(task)),
            GraphNode::Data(data) => NodeMetadata::Data(self.data_metadata(data)),
            GraphNode::TranscodedData(node) => {
                NodeMetadata::Transcoded(self.transcoded_metadata(node))
            }
            GraphNode::Parameters(node) => NodeMetadata::Parameters(parameters_metadata(node)),
        })
    }

    fn data_metadata(&self, data: &DataNode) -> DataMetadata {
        let descriptor = self.resolve_descriptor(&data.head.name);
        DataMetadata {
            name: data.head.name.clone(),
            filepath: descriptor.filepath().map(str::to_string),
            dataset_type: data.dataset_type.clone(),
            run_command: (!data.is_free_input)
                .then(|| format!("run --to-outputs='{}'", data.head.name)),
            stats: data.stats.clone(),
            preview_rows: descriptor.preview().and_then(|args| args.nrows()),
        }
    }

    fn transcoded_metadata(&self, node: &TranscodedDataNode) -> TranscodedMetadata {
        let filepath = node.original_name().and_then(|name| {
            self.resolve_descriptor(name).filepath().map(str::to_string)
        });
        let run_command = match (node.is_free_input, node.original_name()) {
            (false, Some(original)) => Some(format!("run --to-outputs='{original}'")),
            _ => None,
        };
        TranscodedMetadata {
            filepath,
            original_type: node.original_type().map(str::to_string),
            transcoded_types: node.transcoded_types(),
            run_command,
        }
    }
}

fn task_metadata(task: &TaskNode) -> TaskMetadata {
    let full_name = match &task.namespace {
        Some(ns) => format!("{ns}.{}", task.head.name),
        None => task.head.name.clone(),
    };
    TaskMetadata {
        code: task.code.clone(),
        filepath: task.filepath.clone(),
        parameters: task.parameters.clone(),
        run_command: format!("run --to-nodes='{full_name}'"),
        inputs: task.inputs.clone(),
        outputs: task.outputs.clone(),
    }
}

/// Diccionario completo para el nodo global; `{ruta: valor}` para el
/// parámetro individual. Un nodo sin valor resuelto queda en `null`.
fn parameters_metadata(node: &ParametersNode) -> ParametersMetadata {
    let parameters = match (&node.value, node.parameter_path()) {
        (Some(value), Some(path)) => {
            let mut map = serde_json::Map::new();
            map.insert(path.to_string(), value.clone());
            Value::Object(map)
        }
        (Some(value), None) => value.clone(),
        (None, _) => Value::Null,
    };
    ParametersMetadata { parameters }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn task_metadata_builds_the_run_command_from_the_full_name() {
        let mut task = TaskNode::new(
            "abc12345".to_string(),
            "train".to_string(),
            Some("a.science".to_string()),
            BTreeSet::new(),
        );
        task.inputs = vec!["model_inputs".to_string()];
        task.outputs = vec!["a.science.model".to_string()];
        let meta = task_metadata(&task);
        assert_eq!(meta.run_command, "run --to-nodes='a.science.train'");
        assert_eq!(meta.inputs, vec!["model_inputs"]);
    }

    #[test]
    fn single_parameter_metadata_wraps_the_value_under_its_path() {
        let node = ParametersNode::new(
            "fff".to_string(),
            "params:split.ratio".to_string(),
            None,
            Some(serde_json::json!(0.1)),
            BTreeSet::new(),
        );
        let meta = parameters_metadata(&node);
        assert_eq!(meta.parameters, serde_json::json!({"split.ratio": 0.1}));
    }

    #[test]
    fn global_parameters_metadata_exposes_the_whole_dict() {
        let node = ParametersNode::new(
            "fff".to_string(),
            "parameters".to_string(),
            None,
            Some(serde_json::json!({"lr": 0.01})),
            BTreeSet::new(),
        );
        let meta = parameters_metadata(&node);
        assert_eq!(meta.parameters, serde_json::json!({"lr": 0.01}));
        assert!(!NodeMetadata::Parameters(meta).is_empty());
    }

    #[test]
    fn valueless_parameters_node_counts_as_empty_metadata() {
        let node = ParametersNode::new(
            "fff".to_string(),
            "params:missing".to_string(),
            None,
            None,
            BTreeSet::new(),
        );
        assert!(NodeMetadata::Parameters(parameters_metadata(&node)).is_empty());
    }
}
