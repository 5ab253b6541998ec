// viz-domain library entry point
pub mod catalog;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod task;
pub use catalog::{CatalogSpec, DatasetEntry};
pub use dataset::{DatasetDescriptor, PreviewArgs};
pub use error::DomainError;
pub use pipeline::PipelineSpec;
pub use task::TaskSpec;
