//! viz-core: modelo de grafo determinista y proyecciones de ejecución
pub mod catalog;
pub mod constants;
pub mod errors;
pub mod graph;
pub mod ident;
pub mod model;
pub mod params;
pub mod repo;
pub mod run;

pub use catalog::{Catalog, InMemoryCatalog};
pub use errors::GraphError;
pub use graph::modular::ModularTree;
pub use graph::query::{
    DataMetadata, GraphSelection, NodeMetadata, ParametersMetadata, TaskMetadata, TranscodedMetadata,
};
pub use graph::registry::GraphRegistry;
pub use model::{
    DataNode, DatasetRunInfo, DatasetState, GraphEdge, GraphNode, ModularPipelineChild,
    ModularPipelineNode, NodeHead, NodeRunInfo, NodeType, ParametersNode, PipelineRunInfo,
    RegisteredPipeline, RunErrorInfo, RunEvent, RunEventKind, RunState, RunStatus, Tag, TaskNode,
    TranscodedDataNode,
};
pub use run::transform_events;
