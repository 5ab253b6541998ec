//! Nodo del árbol de modular pipelines: la vista colapsable del grafo.

use std::collections::BTreeSet;

use crate::model::NodeType;

/// Referencia a un hijo dentro del árbol (`{id, tipo}`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ModularPipelineChild {
    pub id: String,
    pub node_type: NodeType,
}

/// Un modular pipeline con su interfaz de datasets.
///
/// Los conjuntos `external_*` salen del análisis de entradas/salidas libres
/// del sub-pipeline; los `internal_*` se rellenan al propagar la interfaz de
/// los hijos anidados hacia el padre.
#[derive(Debug, Clone, PartialEq)]
pub struct ModularPipelineNode {
    pub id: String,
    pub name: String,
    pub tags: BTreeSet<String>,
    pub pipelines: BTreeSet<String>,
    pub children: BTreeSet<ModularPipelineChild>,
    pub internal_inputs: BTreeSet<String>,
    pub internal_outputs: BTreeSet<String>,
    pub external_inputs: BTreeSet<String>,
    pub external_outputs: BTreeSet<String>,
}

impl ModularPipelineNode {
    pub fn new(id: &str) -> Self {
        ModularPipelineNode {
            id: id.to_string(),
            name: id.to_string(),
            tags: BTreeSet::new(),
            pipelines: BTreeSet::new(),
            children: BTreeSet::new(),
            internal_inputs: BTreeSet::new(),
            internal_outputs: BTreeSet::new(),
            external_inputs: BTreeSet::new(),
            external_outputs: BTreeSet::new(),
        }
    }

    pub fn add_child(&mut self, id: &str, node_type: NodeType) {
        self.children.insert(ModularPipelineChild { id: id.to_string(), node_type });
    }

    /// Interfaz de entrada: `(external_inputs ∪ internal_inputs) \ internal_outputs`.
    pub fn inputs(&self) -> BTreeSet<String> {
        self.external_inputs
            .union(&self.internal_inputs)
            .filter(|id| !self.internal_outputs.contains(*id))
            .cloned()
            .collect()
    }

    /// Interfaz de salida: `external_outputs ∪ (internal_outputs \ internal_inputs)`.
    pub fn outputs(&self) -> BTreeSet<String> {
        self.external_outputs
            .union(
                &self
                    .internal_outputs
                    .difference(&self.internal_inputs)
                    .cloned()
                    .collect::<BTreeSet<_>>(),
            )
            .cloned()
            .collect()
    }
}
