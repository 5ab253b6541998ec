//! Modelo del grafo: nodos, aristas, etiquetas, árbol modular y estado de ejecución.

pub mod edge;
pub mod modular;
pub mod node;
pub mod pipeline;
pub mod run;
pub mod tag;

pub use edge::GraphEdge;
pub use modular::{ModularPipelineChild, ModularPipelineNode};
pub use node::{DataNode, GraphNode, NodeHead, NodeType, ParametersNode, TaskNode, TranscodedDataNode};
pub use pipeline::RegisteredPipeline;
pub use run::{
    DatasetRunInfo, DatasetState, NodeRunInfo, PipelineRunInfo, RunErrorInfo, RunEvent,
    RunEventKind, RunState, RunStatus,
};
pub use tag::Tag;
