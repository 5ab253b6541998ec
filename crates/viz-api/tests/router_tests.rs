// Pruebas del router con peticiones completas en memoria: documento
// principal, búsquedas por id, proyección de ejecución y los modos de
// degradación ante fuentes rotas.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use indexmap::IndexMap;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use viz_adapters::{AdapterError, EventSource, PreviewLoader, PreviewPolicy, StaticEventSource};
use viz_api::{make_router, ApiState};
use viz_core::{GraphRegistry, InMemoryCatalog, RunEvent, RunEventKind};
use viz_domain::{DatasetDescriptor, DatasetEntry, PipelineSpec, TaskSpec};

fn descriptor(name: &str, dataset_type: &str, viz: Value) -> DatasetDescriptor {
    let entry = DatasetEntry::new(
        Some(dataset_type.to_string()),
        Some(format!("data/{name}.json")),
        Some(json!({ "viz": viz })),
    );
    DatasetDescriptor::from_entry(name, &entry)
}

fn sample_registry() -> GraphRegistry {
    let tasks = vec![
        TaskSpec::new("clean", vec!["raw".to_string()], vec!["clean".to_string()]).unwrap(),
        TaskSpec::new("fit", vec!["clean".to_string()], vec!["model".to_string()]).unwrap(),
    ];
    let mut pipelines = IndexMap::new();
    pipelines.insert("__default__".to_string(), PipelineSpec::new(tasks).unwrap());

    let catalog = InMemoryCatalog::new()
        .with_descriptor(
            "raw",
            descriptor("raw", "pandas.CSVDataset", json!({"preview_args": {"nrows": 2}})),
        )
        .with_layer("raw", "raw")
        .with_layer("clean", "intermediate")
        .with_layer("model", "output");

    let mut registry = GraphRegistry::new(Arc::new(catalog));
    registry.add_pipelines(&pipelines);
    registry
}

fn state_with_events(events: Vec<RunEvent>) -> Arc<ApiState> {
    Arc::new(ApiState::new(
        sample_registry(),
        Arc::new(StaticEventSource::new(events)),
        PreviewLoader::new(PreviewPolicy::disabled(), std::env::temp_dir()),
    ))
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

fn node_id_by_name(document: &Value, name: &str) -> String {
    document["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|node| node["name"] == name)
        .unwrap_or_else(|| panic!("no hay nodo llamado '{name}'"))["id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn main_document_carries_the_default_pipeline() {
    let router = make_router(state_with_events(Vec::new()));
    let (status, document) = get(router, "/api/main").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(document["selected_pipeline"], "__default__");
    assert_eq!(document["nodes"].as_array().unwrap().len(), 5);
    assert_eq!(document["edges"].as_array().unwrap().len(), 4);
    assert_eq!(document["layers"], json!(["raw", "intermediate", "output"]));

    // Toda arista une dos nodos presentes en el documento
    let ids: BTreeSet<&str> = document["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|node| node["id"].as_str().unwrap())
        .collect();
    for edge in document["edges"].as_array().unwrap() {
        assert!(ids.contains(edge["source"].as_str().unwrap()));
        assert!(ids.contains(edge["target"].as_str().unwrap()));
    }

    let root = &document["modular_pipelines"]["__root__"];
    assert_eq!(root["id"], "__root__");
    assert!(!root["children"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn pipelines_endpoint_distinguishes_known_from_unknown() {
    let state = state_with_events(Vec::new());

    let (status, document) = get(make_router(state.clone()), "/api/pipelines/__default__").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(document["selected_pipeline"], "__default__");

    let (status, body) = get(make_router(state), "/api/pipelines/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn node_lookup_serves_variant_metadata() {
    let state = state_with_events(Vec::new());
    let (_, document) = get(make_router(state.clone()), "/api/main").await;

    let fit_id = node_id_by_name(&document, "fit");
    let (status, metadata) = get(make_router(state.clone()), &format!("/api/nodes/{fit_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(metadata["run_command"], "run --to-nodes='fit'");
    assert_eq!(metadata["inputs"], json!(["clean"]));
    assert_eq!(metadata["outputs"], json!(["model"]));

    let raw_id = node_id_by_name(&document, "raw");
    let (_, metadata) = get(make_router(state.clone()), &format!("/api/nodes/{raw_id}")).await;
    assert_eq!(metadata["type"], "pandas.CSVDataset");
    assert_eq!(metadata["filepath"], "data/raw.json");
    assert!(metadata.get("run_command").is_none(), "las entradas libres no llevan run_command");

    let (status, body) = get(make_router(state), "/api/nodes/deadbeef").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("deadbeef"));
}

#[tokio::test]
async fn node_preview_is_attached_when_the_policy_allows_it() {
    let ts = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let dir: PathBuf =
        std::env::temp_dir().join(format!("flowviz-api-{}-{}-preview", std::process::id(), ts));
    fs::create_dir_all(dir.join("data")).unwrap();
    fs::write(
        dir.join("data").join("raw.json"),
        serde_json::to_string(&json!([{"r": 1}, {"r": 2}, {"r": 3}])).unwrap(),
    )
    .unwrap();

    let state = Arc::new(ApiState::new(
        sample_registry(),
        Arc::new(StaticEventSource::default()),
        PreviewLoader::new(PreviewPolicy::default(), &dir),
    ));
    let (_, document) = get(make_router(state.clone()), "/api/main").await;
    let raw_id = node_id_by_name(&document, "raw");

    let (_, metadata) = get(make_router(state), &format!("/api/nodes/{raw_id}")).await;
    // El descriptor declara nrows=2, por debajo del techo de la política
    assert_eq!(metadata["preview"], json!([{"r": 1}, {"r": 2}]));

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn run_status_projects_the_event_list() {
    let start: DateTime<Utc> = "2024-05-01T10:00:00Z".parse().unwrap();
    let end: DateTime<Utc> = "2024-05-01T10:01:00Z".parse().unwrap();

    let mut before = RunEvent::new(RunEventKind::BeforePipelineRun);
    before.timestamp = Some(start);
    let mut node_run = RunEvent::new(RunEventKind::AfterNodeRun);
    node_run.node_id = Some("fit01234".to_string());
    node_run.node = Some("fit".to_string());
    node_run.duration_sec = Some(json!(1.5));
    let mut saved = RunEvent::new(RunEventKind::AfterDatasetSaved);
    saved.node_id = Some("model123".to_string());
    saved.dataset = Some("model".to_string());
    saved.size_bytes = Some(json!(2048));
    let mut after = RunEvent::new(RunEventKind::AfterPipelineRun);
    after.timestamp = Some(end);

    let router = make_router(state_with_events(vec![before, node_run, saved, after]));
    let (status, run) = get(router, "/api/run-status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(run["pipeline"]["status"], "successful");
    assert_eq!(run["pipeline"]["duration_sec"], 60.0);
    assert_ne!(run["pipeline"]["run_id"], "default-run-id");
    assert_eq!(run["nodes"]["fit01234"]["duration_sec"], 1.5);
    assert_eq!(run["datasets"]["model123"]["size_bytes"], 2048);
    assert_eq!(run["datasets"]["model123"]["status"], "available");
}

struct BrokenEvents;

#[async_trait::async_trait]
impl EventSource for BrokenEvents {
    async fn load_events(&self) -> Result<Vec<RunEvent>, AdapterError> {
        Err(AdapterError::InputMalformed {
            file: "events.json".to_string(),
            detail: "contenido ilegible".to_string(),
        })
    }
}

#[tokio::test]
async fn broken_event_sources_degrade_to_an_empty_projection() {
    let state = Arc::new(ApiState::new(
        sample_registry(),
        Arc::new(BrokenEvents),
        PreviewLoader::new(PreviewPolicy::disabled(), std::env::temp_dir()),
    ));
    let (status, run) = get(make_router(state), "/api/run-status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(run["pipeline"]["run_id"], "default-run-id");
    assert_eq!(run["nodes"], json!({}));
    assert_eq!(run["datasets"], json!({}));
}

#[tokio::test]
async fn loaded_documents_short_circuit_the_main_endpoint_only() {
    let saved = json!({"nodes": [], "edges": [], "selected_pipeline": "guardado"});
    let state = Arc::new(
        ApiState::new(
            sample_registry(),
            Arc::new(StaticEventSource::default()),
            PreviewLoader::new(PreviewPolicy::disabled(), std::env::temp_dir()),
        )
        .with_loaded_document(Some(saved.clone())),
    );

    let (status, document) = get(make_router(state.clone()), "/api/main").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(document, saved);

    // Las consultas por id siguen atacando al registro vivo
    let (status, document) = get(make_router(state), "/api/pipelines/__default__").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(document["selected_pipeline"], "__default__");
}
