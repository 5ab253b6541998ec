//! Conjunto de aristas con orden de inserción estable y sin duplicados.

use indexmap::IndexSet;
use std::collections::BTreeSet;

use crate::model::GraphEdge;

#[derive(Debug, Default)]
pub struct EdgeRepository {
    edges: IndexSet<GraphEdge>,
}

impl EdgeRepository {
    pub fn new() -> Self {
        EdgeRepository::default()
    }

    /// Inserta la arista; los duplicados colapsan en silencio.
    pub fn add(&mut self, edge: GraphEdge) {
        self.edges.insert(edge);
    }

    pub fn remove(&mut self, edge: &GraphEdge) -> bool {
        self.edges.shift_remove(edge)
    }

    pub fn as_list(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter()
    }

    /// Aristas cuyos dos extremos pertenecen al conjunto dado.
    pub fn get_by_node_ids<'a>(&'a self, ids: &'a BTreeSet<String>) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges
            .iter()
            .filter(|edge| ids.contains(&edge.source) && ids.contains(&edge.target))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
