//! Etiquetas de usuario sobre tareas; comparables y ordenables por id.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

impl Tag {
    /// El id y el nombre visible son la propia cadena de la etiqueta.
    pub fn new(name: &str) -> Self {
        Tag { id: name.to_string(), name: name.to_string() }
    }
}
