//! Errores específicos del núcleo del grafo (simples por ahora).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum GraphError {
    #[error("dataset '{0}' is not declared in the catalog")] DatasetNotFound(String),
    #[error("parameter '{0}' cannot be resolved")] ParameterNotFound(String),
    #[error("registered pipeline '{0}' does not exist")] PipelineNotFound(String),
    #[error("node '{0}' does not exist")] NodeNotFound(String),
    #[error("layer dependencies form a cycle")] LayerCycle,
    #[error("invalid parameter override '{0}'")] InvalidOverride(String),
    #[error("internal: {0}")] Internal(String),
}
