//! Construcción del grafo: ingesta de pipelines, árbol de modular pipelines,
//! orden topológico de capas y proyecciones de consulta.

pub mod ingest;
pub mod layers;
pub mod modular;
pub mod query;
pub mod registry;

pub use layers::sort_layers;
pub use modular::{build_tree, ModularTree};
pub use query::{
    DataMetadata, GraphSelection, NodeMetadata, ParametersMetadata, TaskMetadata,
    TranscodedMetadata,
};
pub use registry::GraphRegistry;
