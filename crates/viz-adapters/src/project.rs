//! Carga de la definición de un proyecto desde disco.
//!
//! Un proyecto es un directorio con `pipelines.json` (obligatorio) y
//! `catalog.json` (opcional) más los ficheros laterales de estadísticas,
//! estilos y eventos. Un entorno (`--env local`) superpone ficheros: si
//! `<raíz>/<entorno>/<fichero>` existe, sustituye al de la raíz.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use viz_core::GraphError;
use viz_domain::{CatalogSpec, PipelineSpec, TaskSpec};

use crate::error::AdapterError;
use crate::sidecars;

pub const PIPELINES_FILE: &str = "pipelines.json";
pub const CATALOG_FILE: &str = "catalog.json";
pub const STATS_FILE: &str = "stats.json";
pub const STYLES_FILE: &str = "styles.json";
pub const EVENTS_FILE: &str = "events.json";

/// Localiza y parsea los ficheros de un proyecto.
#[derive(Debug, Clone)]
pub struct ProjectLoader {
    root: PathBuf,
    env: Option<String>,
}

/// Contenido ya validado de un proyecto: pipelines registrados en orden de
/// declaración y el documento de catálogo.
#[derive(Debug, Clone)]
pub struct ProjectDefinition {
    pipelines: IndexMap<String, PipelineSpec>,
    catalog: CatalogSpec,
}

impl ProjectLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ProjectLoader { root: root.into(), env: None }
    }

    pub fn with_env(mut self, env: Option<String>) -> Self {
        self.env = env.filter(|e| !e.is_empty());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ruta efectiva de un fichero del proyecto, con la superposición de
    /// entorno aplicada.
    pub fn resolve_file(&self, name: &str) -> PathBuf {
        if let Some(env) = &self.env {
            let candidate = self.root.join(env).join(name);
            if candidate.exists() {
                return candidate;
            }
        }
        self.root.join(name)
    }

    pub fn load(&self) -> Result<ProjectDefinition, AdapterError> {
        let pipelines_path = self.resolve_file(PIPELINES_FILE);
        let declared: IndexMap<String, Vec<TaskSpec>> = read_json(&pipelines_path)?;
        let mut pipelines = IndexMap::new();
        for (id, tasks) in declared {
            let pipeline = PipelineSpec::new(tasks).map_err(|err| AdapterError::InputMalformed {
                file: pipelines_path.display().to_string(),
                detail: format!("pipeline '{id}': {err}"),
            })?;
            pipelines.insert(id, pipeline);
        }

        let catalog_path = self.resolve_file(CATALOG_FILE);
        let catalog = if catalog_path.exists() {
            read_json(&catalog_path)?
        } else {
            log::debug!("proyecto sin {CATALOG_FILE}; se asume catálogo vacío");
            CatalogSpec::default()
        };

        Ok(ProjectDefinition { pipelines, catalog })
    }

    pub fn load_stats(&self) -> HashMap<String, Value> {
        sidecars::load_stats(&self.resolve_file(STATS_FILE))
    }

    pub fn load_styles(&self) -> HashMap<String, Value> {
        sidecars::load_styles(&self.resolve_file(STYLES_FILE))
    }

    pub fn events_path(&self) -> PathBuf {
        self.resolve_file(EVENTS_FILE)
    }
}

impl ProjectDefinition {
    pub fn pipelines(&self) -> &IndexMap<String, PipelineSpec> {
        &self.pipelines
    }

    pub fn catalog(&self) -> &CatalogSpec {
        &self.catalog
    }

    /// Restringe la ingesta a un único pipeline registrado.
    pub fn select_pipeline(&mut self, id: &str) -> Result<(), GraphError> {
        if !self.pipelines.contains_key(id) {
            return Err(GraphError::PipelineNotFound(id.to_string()));
        }
        self.pipelines.retain(|key, _| key == id);
        Ok(())
    }

    /// Funde sobrescrituras de línea de comandos dentro de los parámetros
    /// del catálogo.
    pub fn override_parameters(&mut self, overrides: &Map<String, Value>) {
        if overrides.is_empty() {
            return;
        }
        let mut parameters = self.catalog.parameters().clone();
        viz_core::params::apply_overrides(&mut parameters, overrides);
        self.catalog.set_parameters(parameters);
    }

    pub fn into_parts(self) -> (IndexMap<String, PipelineSpec>, CatalogSpec) {
        (self.pipelines, self.catalog)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AdapterError> {
    let file = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|err| AdapterError::io(file.clone(), err))?;
    serde_json::from_str(&raw).map_err(|err| AdapterError::malformed(file, err))
}
