//! Servicio de identificadores: hashes cortos y normalización de nombres.
//!
//! Todos los ids de nodo del grafo salen de aquí para que las distintas
//! pasadas (ingesta, árbol modular, transformador de eventos) coincidan
//! al referirse al mismo dataset o tarea.

mod hash;
mod names;

pub use hash::short_hash;
pub use names::{
    expand_namespaces, is_parameter_name, is_transcoded, namespace_of, parameter_path,
    strip_transcoding, transcoding_variant,
};

use viz_domain::TaskSpec;

/// Id estable de un nodo de dataset; las variantes transcodificadas
/// colapsan porque el nombre se normaliza antes de hashear.
pub fn dataset_node_id(name: &str) -> String {
    short_hash(strip_transcoding(name))
}

/// Id estable de un nodo de tarea a partir de su forma canónica.
pub fn task_node_id(task: &TaskSpec) -> String {
    short_hash(&task.canonical_repr())
}
