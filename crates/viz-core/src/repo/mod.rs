//! Repositorios del grafo: estado que la ingesta puebla una sola vez y las
//! consultas leen sin mutar.

pub mod edges;
pub mod nodes;
pub mod pipelines;
pub mod tags;

pub use edges::EdgeRepository;
pub use nodes::NodeRepository;
pub use pipelines::RegisteredPipelineRepository;
pub use tags::TagRepository;
