//! Repositorio de nodos con orden de inserción estable.
//!
//! El orden en que se insertan los nodos determina el orden del listado en
//! las respuestas, así que el mapa conserva inserción además de indexar por id.

use indexmap::IndexMap;
use std::collections::BTreeSet;

use crate::model::GraphNode;

#[derive(Debug, Default)]
pub struct NodeRepository {
    nodes: IndexMap<String, GraphNode>,
}

impl NodeRepository {
    pub fn new() -> Self {
        NodeRepository::default()
    }

    /// Inserta el nodo si el id es nuevo; devuelve siempre el nodo almacenado,
    /// de modo que un alta repetida recupera el registro original.
    pub fn add(&mut self, node: GraphNode) -> &mut GraphNode {
        let id = node.id().to_string();
        self.nodes.entry(id).or_insert(node)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn get_mut_by_id(&mut self, id: &str) -> Option<&mut GraphNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Listado completo en orden de inserción.
    pub fn as_list(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn as_list_mut(&mut self) -> impl Iterator<Item = &mut GraphNode> {
        self.nodes.values_mut()
    }

    pub fn get_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Filtra por pertenencia conservando el orden de inserción.
    pub fn get_by_ids<'a>(&'a self, ids: &'a BTreeSet<String>) -> impl Iterator<Item = &'a GraphNode> {
        self.nodes.values().filter(|node| ids.contains(node.id()))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
