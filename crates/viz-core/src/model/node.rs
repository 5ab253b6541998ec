//! Nodos del grafo como tipo suma: cada variante lleva sus propios campos
//! y una cabecera común con los atributos compartidos.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Etiqueta de tipo expuesta en la API. Los nodos transcodificados comparten
/// la etiqueta `data`; `modularPipeline` solo aparece en referencias de hijo
/// dentro del árbol modular.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeType {
    #[serde(rename = "task")]
    Task,
    #[serde(rename = "data")]
    Data,
    #[serde(rename = "parameters")]
    Parameters,
    #[serde(rename = "modularPipeline")]
    ModularPipeline,
}

/// Atributos compartidos por todas las variantes de nodo.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeHead {
    pub id: String,
    pub name: String,
    pub tags: BTreeSet<String>,
    pub pipelines: BTreeSet<String>,
    pub modular_pipelines: BTreeSet<String>,
}

impl NodeHead {
    pub fn new(id: String, name: String, modular_pipelines: BTreeSet<String>) -> Self {
        NodeHead { id, name, tags: BTreeSet::new(), pipelines: BTreeSet::new(), modular_pipelines }
    }
}

/// Tarea ejecutable; `parameters` se va poblando a medida que la ingesta
/// conecta nodos de parámetros a sus entradas.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskNode {
    pub head: NodeHead,
    pub namespace: Option<String>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub parameters: IndexMap<String, Value>,
    pub code: Option<String>,
    pub filepath: Option<String>,
}

impl TaskNode {
    pub fn new(id: String, name: String, namespace: Option<String>, modular_pipelines: BTreeSet<String>) -> Self {
        TaskNode {
            head: NodeHead::new(id, name, modular_pipelines),
            namespace,
            inputs: Vec::new(),
            outputs: Vec::new(),
            parameters: IndexMap::new(),
            code: None,
            filepath: None,
        }
    }
}

/// Dataset simple (sin variantes de transcodificación).
#[derive(Debug, Clone, PartialEq)]
pub struct DataNode {
    pub head: NodeHead,
    pub layer: Option<String>,
    pub dataset_type: Option<String>,
    pub is_free_input: bool,
    pub stats: Option<Value>,
    pub viz_metadata: Option<Value>,
}

impl DataNode {
    pub fn new(
        id: String,
        name: String,
        layer: Option<String>,
        dataset_type: Option<String>,
        is_free_input: bool,
        modular_pipelines: BTreeSet<String>,
    ) -> Self {
        DataNode {
            head: NodeHead::new(id, name, modular_pipelines),
            layer,
            dataset_type,
            is_free_input,
            stats: None,
            viz_metadata: None,
        }
    }
}

/// Nodo virtual que agrupa las variantes `base@sufijo` de un dataset.
///
/// La variante escrita por una tarea se considera la original; las demás
/// quedan como transcodificadas. Si ninguna variante se escribe, la primera
/// vista ocupa el puesto de original.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodedDataNode {
    pub head: NodeHead,
    pub layer: Option<String>,
    pub is_free_input: bool,
    pub stats: Option<Value>,
    pub viz_metadata: Option<Value>,
    variants: BTreeMap<String, Option<String>>,
    original_name: Option<String>,
    original_pinned: bool,
}

impl TranscodedDataNode {
    pub fn new(id: String, base_name: String, layer: Option<String>, is_free_input: bool, modular_pipelines: BTreeSet<String>) -> Self {
        TranscodedDataNode {
            head: NodeHead::new(id, base_name, modular_pipelines),
            layer,
            is_free_input,
            stats: None,
            viz_metadata: None,
            variants: BTreeMap::new(),
            original_name: None,
            original_pinned: false,
        }
    }

    /// Registra una variante. `is_output` marca que alguna tarea la escribe,
    /// lo que la promociona a original (la primera escritura gana).
    pub fn attach_variant(&mut self, name: &str, dataset_type: Option<String>, is_output: bool) {
        self.variants.insert(name.to_string(), dataset_type);
        match (&self.original_name, is_output, self.original_pinned) {
            (None, _, _) => {
                self.original_name = Some(name.to_string());
                self.original_pinned = is_output;
            }
            (Some(_), true, false) => {
                self.original_name = Some(name.to_string());
                self.original_pinned = true;
            }
            _ => {}
        }
    }

    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    pub fn original_type(&self) -> Option<&str> {
        self.original_name
            .as_ref()
            .and_then(|name| self.variants.get(name))
            .and_then(|t| t.as_deref())
    }

    /// Tipos del resto de variantes, en orden estable por nombre de variante.
    pub fn transcoded_types(&self) -> Vec<String> {
        self.variants
            .iter()
            .filter(|(name, _)| Some(name.as_str()) != self.original_name())
            .filter_map(|(_, t)| t.clone())
            .collect()
    }

    pub fn transcoded_names(&self) -> Vec<&str> {
        self.variants
            .keys()
            .map(String::as_str)
            .filter(|name| Some(*name) != self.original_name())
            .collect()
    }
}

/// Nodo de parámetros: o bien el diccionario global `parameters`, o una
/// entrada individual `params:<ruta>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParametersNode {
    pub head: NodeHead,
    pub layer: Option<String>,
    pub value: Option<Value>,
}

impl ParametersNode {
    pub fn new(id: String, name: String, layer: Option<String>, value: Option<Value>, modular_pipelines: BTreeSet<String>) -> Self {
        ParametersNode { head: NodeHead::new(id, name, modular_pipelines), layer, value }
    }

    pub fn is_all_parameters(&self) -> bool {
        self.head.name == crate::constants::ALL_PARAMETERS_NODE_NAME
    }

    pub fn parameter_path(&self) -> Option<&str> {
        crate::ident::parameter_path(&self.head.name)
    }
}

/// Vértice del grafo; las operaciones comunes delegan en la cabecera.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphNode {
    Task(TaskNode),
    Data(DataNode),
    TranscodedData(TranscodedDataNode),
    Parameters(ParametersNode),
}

impl GraphNode {
    pub fn head(&self) -> &NodeHead {
        match self {
            GraphNode::Task(n) => &n.head,
            GraphNode::Data(n) => &n.head,
            GraphNode::TranscodedData(n) => &n.head,
            GraphNode::Parameters(n) => &n.head,
        }
    }

    pub fn head_mut(&mut self) -> &mut NodeHead {
        match self {
            GraphNode::Task(n) => &mut n.head,
            GraphNode::Data(n) => &mut n.head,
            GraphNode::TranscodedData(n) => &mut n.head,
            GraphNode::Parameters(n) => &mut n.head,
        }
    }

    pub fn id(&self) -> &str {
        &self.head().id
    }

    pub fn name(&self) -> &str {
        &self.head().name
    }

    /// Etiqueta de tipo tal como se expone en la API.
    pub fn node_type(&self) -> NodeType {
        match self {
            GraphNode::Task(_) => NodeType::Task,
            GraphNode::Data(_) | GraphNode::TranscodedData(_) => NodeType::Data,
            GraphNode::Parameters(_) => NodeType::Parameters,
        }
    }

    pub fn layer(&self) -> Option<&str> {
        match self {
            GraphNode::Task(_) => None,
            GraphNode::Data(n) => n.layer.as_deref(),
            GraphNode::TranscodedData(n) => n.layer.as_deref(),
            GraphNode::Parameters(n) => n.layer.as_deref(),
        }
    }

    pub fn is_free_input(&self) -> Option<bool> {
        match self {
            GraphNode::Data(n) => Some(n.is_free_input),
            GraphNode::TranscodedData(n) => Some(n.is_free_input),
            _ => None,
        }
    }

    pub fn as_task(&self) -> Option<&TaskNode> {
        match self {
            GraphNode::Task(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_task_mut(&mut self) -> Option<&mut TaskNode> {
        match self {
            GraphNode::Task(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&DataNode> {
        match self {
            GraphNode::Data(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_transcoded(&self) -> Option<&TranscodedDataNode> {
        match self {
            GraphNode::TranscodedData(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_parameters(&self) -> Option<&ParametersNode> {
        match self {
            GraphNode::Parameters(n) => Some(n),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcoded_variant_written_last_still_becomes_original() {
        let mut node = TranscodedDataNode::new("abc".into(), "cars".into(), None, false, BTreeSet::new());
        node.attach_variant("cars@spark", Some("spark.SparkDataset".into()), false);
        node.attach_variant("cars@pandas", Some("pandas.CSVDataset".into()), true);
        assert_eq!(node.original_name(), Some("cars@pandas"));
        assert_eq!(node.original_type(), Some("pandas.CSVDataset"));
        assert_eq!(node.transcoded_types(), vec!["spark.SparkDataset".to_string()]);
    }

    #[test]
    fn transcoded_first_write_wins_over_later_writes() {
        let mut node = TranscodedDataNode::new("abc".into(), "cars".into(), None, false, BTreeSet::new());
        node.attach_variant("cars@pandas", Some("pandas.CSVDataset".into()), true);
        node.attach_variant("cars@spark", Some("spark.SparkDataset".into()), true);
        assert_eq!(node.original_name(), Some("cars@pandas"));
    }

    #[test]
    fn transcoded_serializes_as_data() {
        let node = GraphNode::TranscodedData(TranscodedDataNode::new(
            "abc".into(),
            "cars".into(),
            None,
            false,
            BTreeSet::new(),
        ));
        assert_eq!(node.node_type(), NodeType::Data);
        assert_eq!(serde_json::to_string(&node.node_type()).unwrap(), "\"data\"");
    }
}
