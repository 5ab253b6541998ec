//! Transformador de eventos de ejecución: pliega la secuencia cruda de
//! `events.json` en un `RunStatus` estructurado.
//!
//! La proyección es una función pura de la lista de eventos: dos barridos
//! dirigidos para los límites del pipeline y una pasada principal de
//! izquierda a derecha para tareas y datasets.

use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

use crate::constants::DEFAULT_RUN_ID;
use crate::ident;
use crate::model::{
    DatasetRunInfo, DatasetState, NodeRunInfo, PipelineRunInfo, RunErrorInfo, RunEvent,
    RunEventKind, RunState, RunStatus,
};

pub fn transform_events(events: &[RunEvent]) -> RunStatus {
    let mut status = RunStatus::default();
    scan_pipeline_boundaries(events, &mut status.pipeline);

    // nombre completo → id, para casar errores que solo traen el nombre
    let mut seen_names: IndexMap<String, String> = IndexMap::new();
    for event in events {
        match event.event {
            RunEventKind::AfterNodeRun => apply_node_run(event, &mut status, &mut seen_names),
            RunEventKind::OnNodeError => apply_node_error(event, &mut status, &mut seen_names),
            RunEventKind::AfterDatasetLoaded => apply_dataset(event, &mut status, false),
            RunEventKind::AfterDatasetSaved => apply_dataset(event, &mut status, true),
            RunEventKind::OnPipelineError => apply_pipeline_error(event, &mut status, &seen_names),
            _ => {}
        }
    }

    finalize(&mut status);
    status
}

/// Primer `before_pipeline_run` → inicio; último evento de cierre → fin y
/// estado (con su error si el cierre fue `on_pipeline_error`).
fn scan_pipeline_boundaries(events: &[RunEvent], pipeline: &mut PipelineRunInfo) {
    pipeline.start_time = events
        .iter()
        .find(|e| matches!(e.event, RunEventKind::BeforePipelineRun))
        .and_then(|e| e.timestamp);

    let closing = events.iter().rev().find(|e| {
        matches!(e.event, RunEventKind::AfterPipelineRun | RunEventKind::OnPipelineError)
    });
    if let Some(event) = closing {
        pipeline.end_time = event.timestamp;
        if matches!(event.event, RunEventKind::OnPipelineError) {
            pipeline.status = RunState::Failed;
            let mut error = RunErrorInfo::new(event.error.clone().unwrap_or_default());
            error.traceback = event.traceback.clone();
            pipeline.error = Some(error);
        } else {
            pipeline.status = RunState::Successful;
        }
    }
}

fn apply_node_run(
    event: &RunEvent,
    status: &mut RunStatus,
    seen_names: &mut IndexMap<String, String>,
) {
    let Some(node_id) = event.node_id.clone() else { return };
    if let Some(name) = &event.node {
        seen_names.insert(name.clone(), node_id.clone());
    }
    status.nodes.insert(
        node_id,
        NodeRunInfo {
            status: RunState::Successful,
            duration_sec: lossy_f64(event.duration_sec.as_ref()),
            error: None,
        },
    );
}

fn apply_node_error(
    event: &RunEvent,
    status: &mut RunStatus,
    seen_names: &mut IndexMap<String, String>,
) {
    let Some(node_id) = event.node_id.clone() else { return };
    if let Some(name) = &event.node {
        seen_names.insert(name.clone(), node_id.clone());
    }
    let entry = status.nodes.entry(node_id).or_default();
    entry.status = RunState::Failed;
    let mut error = RunErrorInfo::new(event.error.clone().unwrap_or_default());
    error.traceback = event.traceback.clone();
    entry.error = Some(error);
}

/// Carga y guardado comparten la lógica salvo por el tamaño: el guardado
/// siempre lo sobreescribe, la carga solo lo fija la primera vez.
fn apply_dataset(event: &RunEvent, status: &mut RunStatus, overwrite_size: bool) {
    let Some(key) = dataset_key(event) else { return };
    let name = event.dataset.clone().unwrap_or_default();
    let entry =
        status.datasets.entry(key).or_insert_with(|| DatasetRunInfo::new(name.clone()));
    if entry.name.is_empty() && !name.is_empty() {
        entry.name = name;
    }
    let size = lossy_u64(event.size_bytes.as_ref());
    if overwrite_size || entry.size_bytes.is_none() {
        entry.size_bytes = Some(size);
    }
}

fn apply_pipeline_error(
    event: &RunEvent,
    status: &mut RunStatus,
    seen_names: &IndexMap<String, String>,
) {
    let message = event.error.clone().unwrap_or_default();

    if let Some(dataset_name) = &event.dataset {
        if let Some(key) = dataset_key(event) {
            let entry = status
                .datasets
                .entry(key)
                .or_insert_with(|| DatasetRunInfo::new(dataset_name.clone()));
            entry.status = DatasetState::Missing;
            let mut error = RunErrorInfo::new(message.clone());
            error.traceback = event.traceback.clone();
            error.operation = event.operation.clone();
            error.error_node = event.node.clone();
            entry.error = Some(error);
        }
    }

    // La tarea señalada pasa a fallida; si ya traía su propio error, se respeta
    let node_key = event.node_id.clone().or_else(|| match_node_by_name(event, seen_names));
    if let Some(node_key) = node_key {
        let entry = status.nodes.entry(node_key).or_default();
        entry.status = RunState::Failed;
        if entry.error.is_none() {
            entry.error = Some(RunErrorInfo::new(message.clone()));
        }
    }

    if status.pipeline.error.is_none() {
        let mut error = RunErrorInfo::new(message);
        error.traceback = event.traceback.clone();
        status.pipeline.error = Some(error);
    }
}

/// Id del dataset referido por el evento: el `node_id` si llega, o el hash
/// del nombre declarado en su defecto.
fn dataset_key(event: &RunEvent) -> Option<String> {
    if let Some(id) = &event.node_id {
        return Some(id.clone());
    }
    event.dataset.as_ref().map(|name| ident::dataset_node_id(name))
}

/// Casa el nombre del evento contra los nombres ya vistos: igualdad exacta o
/// sufijo de segmento completo (`ns.corto` termina en `.corto`).
fn match_node_by_name(event: &RunEvent, seen_names: &IndexMap<String, String>) -> Option<String> {
    let name = event.node.as_deref()?;
    seen_names
        .iter()
        .find(|(seen, _)| *seen == name || seen.ends_with(&format!(".{name}")))
        .map(|(_, id)| id.clone())
}

fn finalize(status: &mut RunStatus) {
    if status.pipeline.run_id == DEFAULT_RUN_ID {
        status.pipeline.run_id = Uuid::new_v4().to_string();
    }
    status.pipeline.duration_sec = match (status.pipeline.start_time, status.pipeline.end_time) {
        (Some(start), Some(end)) => (end - start).num_milliseconds() as f64 / 1000.0,
        _ => status.nodes.values().map(|node| node.duration_sec).sum(),
    };
}

/// `duration_sec` llega como número o string; lo que no parsea vale 0.
fn lossy_f64(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    };
    parsed.max(0.0)
}

/// `size_bytes` solo admite enteros; flotantes y strings no numéricos valen 0.
fn lossy_u64(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lossy_parsers_tolerate_strings_and_garbage() {
        assert_eq!(lossy_f64(Some(&json!(1.5))), 1.5);
        assert_eq!(lossy_f64(Some(&json!("2.5"))), 2.5);
        assert_eq!(lossy_f64(Some(&json!("abc"))), 0.0);
        assert_eq!(lossy_f64(Some(&json!(-3.0))), 0.0);
        assert_eq!(lossy_f64(None), 0.0);

        assert_eq!(lossy_u64(Some(&json!(100))), 100);
        assert_eq!(lossy_u64(Some(&json!("100"))), 100);
        assert_eq!(lossy_u64(Some(&json!(3.5))), 0);
        assert_eq!(lossy_u64(Some(&json!("mucho"))), 0);
    }

    #[test]
    fn empty_event_list_projects_to_a_fresh_default() {
        let status = transform_events(&[]);
        assert_ne!(status.pipeline.run_id, DEFAULT_RUN_ID);
        assert_eq!(status.pipeline.status, RunState::Successful);
        assert_eq!(status.pipeline.duration_sec, 0.0);
        assert!(status.nodes.is_empty());
        assert!(status.datasets.is_empty());
    }

    #[test]
    fn duration_falls_back_to_node_sum_without_boundaries() {
        let mut run1 = RunEvent::new(RunEventKind::AfterNodeRun);
        run1.node_id = Some("n1".to_string());
        run1.duration_sec = Some(json!(1.5));
        let mut run2 = RunEvent::new(RunEventKind::AfterNodeRun);
        run2.node_id = Some("n2".to_string());
        run2.duration_sec = Some(json!("2.5"));

        let status = transform_events(&[run1, run2]);
        assert_eq!(status.pipeline.duration_sec, 4.0);
        assert!(status.pipeline.start_time.is_none());
    }

    #[test]
    fn saved_size_overwrites_but_loaded_size_does_not() {
        let mut loaded = RunEvent::new(RunEventKind::AfterDatasetLoaded);
        loaded.node_id = Some("d1".to_string());
        loaded.dataset = Some("ds".to_string());
        loaded.size_bytes = Some(json!(100));
        let mut reloaded = loaded.clone();
        reloaded.size_bytes = Some(json!(999));
        let mut saved = RunEvent::new(RunEventKind::AfterDatasetSaved);
        saved.node_id = Some("d1".to_string());
        saved.dataset = Some("ds".to_string());
        saved.size_bytes = Some(json!(250));

        let status = transform_events(&[loaded, reloaded, saved]);
        let info = &status.datasets["d1"];
        assert_eq!(info.size_bytes, Some(250));
        assert_eq!(info.status, DatasetState::Available);
        assert_eq!(info.name, "ds");
    }

    #[test]
    fn pipeline_error_matches_nodes_by_name_suffix() {
        let mut run = RunEvent::new(RunEventKind::AfterNodeRun);
        run.node_id = Some("n1".to_string());
        run.node = Some("a.science.train".to_string());
        run.duration_sec = Some(json!(1.0));
        let mut error = RunEvent::new(RunEventKind::OnPipelineError);
        error.node = Some("train".to_string());
        error.error = Some("fatal".to_string());

        let status = transform_events(&[run, error]);
        assert_eq!(status.nodes["n1"].status, RunState::Failed);
        assert_eq!(
            status.nodes["n1"].error.as_ref().map(|e| e.message.as_str()),
            Some("fatal")
        );
        assert_eq!(status.pipeline.status, RunState::Failed);
    }
}
