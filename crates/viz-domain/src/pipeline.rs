use std::collections::BTreeSet;

use crate::{DomainError, TaskSpec};

/// Colección validada de tareas que forma un pipeline registrado.
///
/// La validación rechaza nombres completos duplicados; el orden de
/// declaración se conserva tal cual llegó del documento de proyecto.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineSpec {
    tasks: Vec<TaskSpec>,
}

impl PipelineSpec {
    pub fn new(tasks: Vec<TaskSpec>) -> Result<Self, DomainError> {
        let mut seen = BTreeSet::new();
        for task in &tasks {
            task.validate()?;
            if !seen.insert(task.full_name()) {
                return Err(DomainError::ValidationError(format!(
                    "duplicate task '{}' in pipeline",
                    task.full_name()
                )));
            }
        }
        Ok(PipelineSpec { tasks })
    }

    pub fn tasks(&self) -> &[TaskSpec] { &self.tasks }
    pub fn len(&self) -> usize { self.tasks.len() }
    pub fn is_empty(&self) -> bool { self.tasks.is_empty() }

    /// Nombres de datasets consumidos por alguna tarea, tal como fueron declarados.
    pub fn all_inputs(&self) -> BTreeSet<&str> {
        self.tasks.iter().flat_map(|t| t.inputs().iter().map(String::as_str)).collect()
    }

    /// Nombres de datasets producidos por alguna tarea, tal como fueron declarados.
    pub fn all_outputs(&self) -> BTreeSet<&str> {
        self.tasks.iter().flat_map(|t| t.outputs().iter().map(String::as_str)).collect()
    }
}
