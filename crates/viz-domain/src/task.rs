use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::DomainError;

/// Especificación declarativa de una tarea dentro de un pipeline.
///
/// El nombre corto es único dentro de su namespace; el nombre completo
/// (`namespace.nombre`) identifica la tarea en todo el proyecto. Los
/// campos `code` y `filepath` son opcionales y solo alimentan la vista
/// de metadatos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(default)]
    inputs: Vec<String>,
    #[serde(default)]
    outputs: Vec<String>,
    #[serde(default)]
    tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filepath: Option<String>,
}

impl TaskSpec {
    pub fn new(name: &str, inputs: Vec<String>, outputs: Vec<String>) -> Result<Self, DomainError> {
        let spec = TaskSpec {
            name: name.to_string(),
            namespace: None,
            inputs,
            outputs,
            tags: BTreeSet::new(),
            code: None,
            filepath: None,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Reglas de forma sobre el nombre; se aplican también a especificaciones
    /// llegadas por deserialización (ver `PipelineSpec::new`).
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::ValidationError("task name cannot be empty".to_string()));
        }
        if self.name.contains('.') {
            return Err(DomainError::ValidationError(format!(
                "task name '{}' cannot contain '.'; nest it with the namespace field",
                self.name
            )));
        }
        Ok(())
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        if !namespace.is_empty() {
            self.namespace = Some(namespace.to_string());
        }
        self
    }

    pub fn with_tags<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_string());
        self
    }

    pub fn with_filepath(mut self, filepath: &str) -> Self {
        self.filepath = Some(filepath.to_string());
        self
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref().filter(|ns| !ns.is_empty())
    }
    pub fn inputs(&self) -> &[String] { &self.inputs }
    pub fn outputs(&self) -> &[String] { &self.outputs }
    pub fn tags(&self) -> &BTreeSet<String> { &self.tags }
    pub fn code(&self) -> Option<&str> { self.code.as_deref() }
    pub fn filepath(&self) -> Option<&str> { self.filepath.as_deref() }

    /// Nombre completo: `namespace.nombre`, o el nombre corto si no hay namespace.
    pub fn full_name(&self) -> String {
        match self.namespace() {
            Some(ns) => format!("{ns}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Forma canónica estable usada para derivar el identificador de la tarea.
    /// Incluye la firma de entradas/salidas para que dos tareas homónimas con
    /// distinta firma no colapsen en el mismo nodo.
    pub fn canonical_repr(&self) -> String {
        format!(
            "{}([{}]) -> [{}]",
            self.full_name(),
            self.inputs.join(","),
            self.outputs.join(","),
        )
    }
}

impl fmt::Display for TaskSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<task: {}>", self.full_name())
    }
}
