//! Pipelines registrados tal como aparecen en la lista de la respuesta.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredPipeline {
    pub id: String,
    pub name: String,
}

impl RegisteredPipeline {
    pub fn new(id: &str) -> Self {
        RegisteredPipeline { id: id.to_string(), name: pretty_name(id) }
    }
}

/// Nombre visible derivado del id de registro: guiones bajos a espacios y
/// cada palabra capitalizada (`__default__` → `Default`).
fn pretty_name(id: &str) -> String {
    id.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
