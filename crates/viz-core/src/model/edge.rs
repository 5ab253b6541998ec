//! Arista dirigida del flujo de datos. Las aristas forman un conjunto:
//! los duplicados colapsan al insertarse en el repositorio.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    pub fn new(source: &str, target: &str) -> Self {
        GraphEdge { source: source.to_string(), target: target.to_string() }
    }
}
