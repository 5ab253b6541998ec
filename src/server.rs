//! Composición del servidor: del directorio de proyecto al estado servido.
//!
//! La ingesta produce un `GraphRegistry` inmutable; la recarga automática
//! nunca muta el registro publicado, construye uno nuevo y lo intercambia.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde_json::{Map, Value};

use viz_adapters::project::{CATALOG_FILE, PIPELINES_FILE, STATS_FILE, STYLES_FILE};
use viz_adapters::{FileEventSource, JsonCatalog, PreviewLoader, PreviewPolicy, ProjectLoader};
use viz_api::{ApiState, GraphResponse};
use viz_core::{params, GraphRegistry};
use viz_domain::CatalogSpec;

use crate::cli::RunArgs;
use crate::config::ServerConfig;
use crate::errors::ServeError;

/// Intervalo de sondeo de la recarga automática.
const RELOAD_POLL: Duration = Duration::from_secs(2);

/// Ficheros del proyecto cuyo cambio dispara una recarga.
const WATCHED_FILES: [&str; 4] = [PIPELINES_FILE, CATALOG_FILE, STATS_FILE, STYLES_FILE];

/// Ejecuta el comando `run`: compone el estado y sirve hasta la señal de
/// apagado.
pub async fn run(args: RunArgs) -> Result<(), ServeError> {
    let config = ServerConfig::from_env();
    let addr = config.listen_addr(args.host.as_deref(), args.port)?;
    let loader = ProjectLoader::new(&args.project).with_env(args.env.clone());

    let state = if let Some(saved) = &args.load_file {
        Arc::new(loaded_state(&loader, saved).await?)
    } else {
        let overrides = parsed_overrides(args.params.as_deref())?;
        let registry = assemble_registry(&loader, args.pipeline.as_deref(), &overrides)?;
        if let Some(path) = &args.save_file {
            save_main_document(&registry, path).await?;
        }
        let state = Arc::new(live_state(&loader, registry));
        if args.autoreload {
            watch_project(state.clone(), loader.clone(), args.pipeline.clone(), overrides);
        }
        state
    };

    viz_api::serve(addr, state).await?;
    Ok(())
}

/// Ingesta completa de un proyecto: definición, catálogo y laterales.
pub fn assemble_registry(
    loader: &ProjectLoader,
    pipeline: Option<&str>,
    overrides: &Map<String, Value>,
) -> Result<GraphRegistry, ServeError> {
    let mut definition = loader.load()?;
    if let Some(pipeline_id) = pipeline {
        definition.select_pipeline(pipeline_id)?;
    }
    definition.override_parameters(overrides);

    let (pipelines, catalog) = definition.into_parts();
    let mut registry = GraphRegistry::new(Arc::new(JsonCatalog::new(catalog)))
        .with_sidecars(loader.load_stats(), loader.load_styles());
    registry.add_pipelines(&pipelines);
    Ok(registry)
}

/// Estado servido sobre un registro vivo; los eventos y previsualizaciones
/// se leen del proyecto en cada petición.
pub fn live_state(loader: &ProjectLoader, registry: GraphRegistry) -> ApiState {
    let events = Arc::new(FileEventSource::new(loader.events_path()));
    let preview = PreviewLoader::new(PreviewPolicy::default(), loader.root());
    ApiState::new(registry, events, preview)
}

/// Escribe la respuesta principal a disco tras la ingesta.
pub async fn save_main_document(registry: &GraphRegistry, path: &Path) -> Result<(), ServeError> {
    let response = match registry.default_pipeline_id() {
        Some(pipeline_id) => match registry.selection(pipeline_id) {
            Ok(selection) => GraphResponse::from_selection(&selection),
            Err(_) => GraphResponse::empty(),
        },
        None => GraphResponse::empty(),
    };
    let body = serde_json::to_vec_pretty(&response)?;
    tokio::fs::write(path, body)
        .await
        .map_err(|source| ServeError::WriteFile { file: path.display().to_string(), source })?;
    log::info!("documento principal guardado en {}", path.display());
    Ok(())
}

/// Sustituye la ingesta por un documento guardado: la respuesta principal
/// sale del fichero y el resto de endpoints ve un registro vacío.
pub async fn loaded_state(loader: &ProjectLoader, saved: &Path) -> Result<ApiState, ServeError> {
    let raw = tokio::fs::read(saved)
        .await
        .map_err(|source| ServeError::ReadFile { file: saved.display().to_string(), source })?;
    let document: Value = serde_json::from_slice(&raw)
        .map_err(|source| ServeError::SavedDocument { file: saved.display().to_string(), source })?;
    let registry = GraphRegistry::new(Arc::new(JsonCatalog::new(CatalogSpec::default())));
    Ok(live_state(loader, registry).with_loaded_document(Some(document)))
}

fn parsed_overrides(expr: Option<&str>) -> Result<Map<String, Value>, ServeError> {
    match expr {
        Some(expr) => Ok(params::parse_overrides(expr)?),
        None => Ok(Map::new()),
    }
}

/// Vigila los ficheros del proyecto y publica un registro nuevo al cambiar.
/// Una recarga fallida conserva el registro anterior.
fn watch_project(
    state: Arc<ApiState>,
    loader: ProjectLoader,
    pipeline: Option<String>,
    overrides: Map<String, Value>,
) {
    tokio::spawn(async move {
        let mut seen = project_stamp(&loader);
        loop {
            tokio::time::sleep(RELOAD_POLL).await;
            let current = project_stamp(&loader);
            if current == seen {
                continue;
            }
            seen = current;
            match assemble_registry(&loader, pipeline.as_deref(), &overrides) {
                Ok(registry) => {
                    state.replace_registry(registry).await;
                    log::info!("proyecto recargado desde {}", loader.root().display());
                }
                Err(err) => log::warn!("recarga descartada: {err}"),
            }
        }
    });
}

/// Huella de modificación de los ficheros vigilados; un fichero ausente
/// cuenta como `None` para detectar también altas y bajas.
fn project_stamp(loader: &ProjectLoader) -> Vec<Option<SystemTime>> {
    WATCHED_FILES
        .iter()
        .map(|name| {
            fs::metadata(loader.resolve_file(name)).and_then(|meta| meta.modified()).ok()
        })
        .collect()
}
