//! Integración del comando `run`: eventos de ejecución, guardado y recarga
//! del documento principal, y recorte de la ingesta.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Map, Value};
use tower::ServiceExt;

use flowviz_rust::server::{assemble_registry, live_state, loaded_state, save_main_document};
use viz_adapters::ProjectLoader;
use viz_api::make_router;

fn unique_project_dir(suffix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("flowviz-e2e-{}-{suffix}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn node<'a>(body: &'a Value, name: &str, node_type: &str) -> &'a Value {
    body["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["name"] == name && n["type"] == node_type)
        .unwrap()
}

#[tokio::test]
async fn run_events_on_disk_project_into_the_run_status() {
    let dir = unique_project_dir("eventos");
    write_json(
        &dir.join("pipelines.json"),
        &json!({
            "__default__": [ { "name": "f", "inputs": ["raw"], "outputs": ["clean"] } ]
        }),
    );
    write_json(
        &dir.join("events.json"),
        &json!([
            { "event": "before_pipeline_run", "timestamp": "2024-05-05T10:00:00Z" },
            {
                "event": "after_node_run",
                "node_id": "n1",
                "node": "f",
                "duration_sec": 1.5,
                "status": "successful"
            },
            { "event": "after_dataset_loaded", "node_id": "d1", "dataset": "ds", "size_bytes": 100 },
            { "event": "on_node_error", "node_id": "n2", "node": "g", "error": "boom" },
            {
                "event": "on_pipeline_error",
                "timestamp": "2024-05-05T10:01:00Z",
                "dataset": "ds",
                "node_id": "n2",
                "error": "fatal",
                "operation": "saving"
            }
        ]),
    );

    let loader = ProjectLoader::new(&dir);
    let registry = assemble_registry(&loader, None, &Map::new()).unwrap();
    let router = make_router(Arc::new(live_state(&loader, registry)));

    let (status, body) = get(&router, "/api/run-status").await;
    assert_eq!(status, StatusCode::OK);

    let pipeline = &body["pipeline"];
    assert_eq!(pipeline["status"], "failed");
    assert_eq!(pipeline["error"]["message"], "fatal");
    assert_eq!(pipeline["duration_sec"], json!(60.0));
    assert_ne!(pipeline["run_id"], "default-run-id");

    assert_eq!(body["nodes"]["n1"]["status"], "successful");
    assert_eq!(body["nodes"]["n1"]["duration_sec"], json!(1.5));
    assert_eq!(body["nodes"]["n2"]["status"], "failed");
    assert_eq!(body["nodes"]["n2"]["error"]["message"], "boom");

    assert_eq!(body["datasets"]["d1"]["name"], "ds");
    assert_eq!(body["datasets"]["d1"]["status"], "available");
    assert_eq!(body["datasets"]["d1"]["size_bytes"], json!(100));

    // El error de pipeline también deja su dataset marcado como ausente
    let missing = &body["datasets"]["n2"];
    assert_eq!(missing["status"], "missing");
    assert_eq!(missing["error"]["operation"], "saving");
    assert_eq!(missing["error"]["message"], "fatal");

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn saved_documents_round_trip_through_load_file_mode() {
    let dir = unique_project_dir("guardado");
    write_json(
        &dir.join("pipelines.json"),
        &json!({
            "__default__": [ { "name": "f", "inputs": ["raw"], "outputs": ["clean"] } ]
        }),
    );

    let loader = ProjectLoader::new(&dir);
    let registry = assemble_registry(&loader, None, &Map::new()).unwrap();
    let saved = dir.join("main.json");
    save_main_document(&registry, &saved).await.unwrap();

    // El fichero contiene exactamente lo que sirve /api/main en vivo
    let live = make_router(Arc::new(live_state(&loader, registry)));
    let (_, live_body) = get(&live, "/api/main").await;
    let disk: Value = serde_json::from_slice(&fs::read(&saved).unwrap()).unwrap();
    assert_eq!(disk, live_body);

    // En modo load-file la respuesta sale del fichero y el registro queda vacío
    let state = loaded_state(&loader, &saved).await.unwrap();
    let router = make_router(Arc::new(state));
    let (status, main) = get(&router, "/api/main").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(main, disk);

    let (status, _) = get(&router, "/api/pipelines/__default__").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn a_corrupt_saved_document_is_rejected_at_startup() {
    let dir = unique_project_dir("corrupto");
    let saved = dir.join("main.json");
    fs::write(&saved, b"{ sin cerrar").unwrap();

    let loader = ProjectLoader::new(&dir);
    let err = loaded_state(&loader, &saved).await.unwrap_err();
    assert!(err.to_string().contains("main.json"));

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn narrowed_ingestion_with_overrides_serves_one_pipeline() {
    let dir = unique_project_dir("recorte");
    write_json(
        &dir.join("pipelines.json"),
        &json!({
            "__default__": [
                { "name": "split", "inputs": ["raw", "params:split.ratio"], "outputs": ["train"] },
                { "name": "fit", "inputs": ["train"], "outputs": ["model"] }
            ],
            "data_science": [
                { "name": "fit", "inputs": ["train", "params:split.ratio"], "outputs": ["model"] }
            ]
        }),
    );
    write_json(&dir.join("catalog.json"), &json!({ "parameters": { "split.ratio": 0.5 } }));

    let loader = ProjectLoader::new(&dir);
    let overrides = viz_core::params::parse_overrides("split.ratio=0.9").unwrap();
    let registry = assemble_registry(&loader, Some("data_science"), &overrides).unwrap();
    let router = make_router(Arc::new(live_state(&loader, registry)));

    let (status, body) = get(&router, "/api/main").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected_pipeline"], "data_science");
    let registered: Vec<&str> = body["pipelines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(registered, vec!["data_science"]);

    // La sobrescritura de parámetros llega hasta los metadatos de la tarea
    let fit_id = node(&body, "fit", "task")["id"].as_str().unwrap().to_string();
    let (_, meta) = get(&router, &format!("/api/nodes/{fit_id}")).await;
    assert_eq!(meta["parameters"], json!({ "split.ratio": 0.9 }));

    // El pipeline no seleccionado nunca llegó a ingerirse
    let (status, _) = get(&router, "/api/pipelines/__default__").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let _ = fs::remove_dir_all(&dir);
}
