// tests/api_http.rs
//
// HTTP-level tests for the generator Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - GET / (landing, menu closed/open)
// - POST /generate (happy path, gate stop, bad intake_json, missing intake_json)

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt as _; // for `oneshot`

use evia_intake::api::{self, AppState};
use evia_intake::generator::llm::DryRunLlm;
use evia_intake::generator::Generator;

const BODY_LIMIT: usize = 8 * 1024 * 1024;
const BOUNDARY: &str = "evia-test-boundary";

fn prompts_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("prompts")
}

/// Router over a scratch runs root, dry-run stages.
fn test_router(root: &Path) -> Router {
    let runs = root.join("runs");
    let generator = Generator::new(&runs, prompts_dir(), Arc::new(DryRunLlm));
    api::router(AppState::new(generator, runs.join("_uploads"), BODY_LIMIT))
}

/// Hand-built multipart body: intake_json first, then one part per file.
fn multipart_body(intake_json: Option<&str>, files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut out = Vec::new();
    if let Some(j) = intake_json {
        out.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"intake_json\"\r\n\r\n{j}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, mime, bytes) in files {
        out.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\nContent-Type: {mime}\r\n\r\n"
            )
            .as_bytes(),
        );
        out.extend_from_slice(bytes);
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    out
}

fn generate_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("build POST /generate")
}

fn zip_names(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    archive.file_names().map(str::to_string).collect()
}

fn zip_entry(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let mut s = String::new();
    archive
        .by_name(name)
        .expect("entry present")
        .read_to_string(&mut s)
        .expect("utf8 entry");
    s
}

fn full_intake() -> Value {
    json!({
        "project_name": "EVIA Pilot",
        "company_name": "ACME",
        "contact_name": "",
        "contact_email": "",
        "goals": "Сделать MVP",
        "problem_statement": "Нет автоматизации",
        "current_solution": "",
        "target_audience": "B2B",
        "constraints": "",
        "timeline": "45 дней",
        "budget": "",
        "manual_sources": [{ "type": "note", "value": "https://example.org/brief" }]
    })
}

#[tokio::test]
async fn api_health_returns_status_ok() {
    let tmp = tempfile::tempdir().unwrap();
    let app = test_router(tmp.path());

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let v: Value = serde_json::from_slice(&bytes).expect("health json");
    assert_eq!(v, json!({ "status": "ok" }));
}

#[tokio::test]
async fn api_landing_renders_menu_state() {
    let tmp = tempfile::tempdir().unwrap();
    let app = test_router(tmp.path());

    for (uri, open) in [("/", false), ("/?menu=open", true), ("/?menu=closed", false)] {
        let resp = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let ctype = resp.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(ctype.starts_with("text/html"), "{ctype}");

        let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Направления и партнёрства"));
        assert_eq!(html.contains("class=\"mobile\""), open, "{uri}");
    }
}

#[tokio::test]
async fn api_generate_returns_zip_with_all_stages() {
    let tmp = tempfile::tempdir().unwrap();
    let app = test_router(tmp.path());

    let intake = full_intake().to_string();
    let body = multipart_body(Some(&intake), &[("brief.txt", "text/plain", b"hello")]);
    let resp = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/zip");
    let disposition = resp.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"evia_run_"), "{disposition}");
    assert!(disposition.ends_with(".zip\""), "{disposition}");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    let names = zip_names(&bytes);
    for stage in ["0", "1", "2", "3", "3_5", "3_6", "3_7", "4", "5", "6"] {
        assert!(names.contains(&format!("S{stage}.md")), "missing S{stage}.md in {names:?}");
        assert!(names.contains(&format!("S{stage}.json")), "missing S{stage}.json");
    }
    assert!(names.contains(&"S6_final.md".to_string()));
    assert!(names.iter().all(|n| !n.ends_with(".zip")));

    // Uploaded file and manual source both land in S0 evidence.
    let s0: Value = serde_json::from_str(&zip_entry(&bytes, "S0.json")).unwrap();
    let evidence = s0["evidence"].as_array().unwrap();
    assert_eq!(evidence.len(), 2);
    assert_eq!(evidence[0]["type"], "file");
    assert!(evidence[0]["value"].as_str().unwrap().ends_with("brief.txt"));
    assert_eq!(evidence[1]["type"], "note");
    assert_eq!(evidence[1]["value"], "https://example.org/brief");
    assert_eq!(s0["auto_web"], "disabled");

    let stored = tmp.path().join("runs").join("_uploads").join("brief.txt");
    assert_eq!(std::fs::read(stored).unwrap(), b"hello");
}

#[tokio::test]
async fn api_generate_with_blank_required_fields_stops_at_gate() {
    let tmp = tempfile::tempdir().unwrap();
    let app = test_router(tmp.path());

    let mut intake = full_intake();
    intake["goals"] = json!("   ");
    let body = multipart_body(Some(&intake.to_string()), &[]);
    let resp = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    let mut names = zip_names(&bytes);
    names.sort();
    assert_eq!(names, vec!["S0.json", "S0.md"]);

    let s0: Value = serde_json::from_str(&zip_entry(&bytes, "S0.json")).unwrap();
    assert_eq!(s0["status"], "НЕ ГОТОВО");
    assert_eq!(s0["questions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn api_generate_rejects_bad_intake_json() {
    let tmp = tempfile::tempdir().unwrap();
    let app = test_router(tmp.path());

    let resp = app
        .oneshot(generate_request(multipart_body(Some("not json"), &[])))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    let v: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(v["error"].as_str().unwrap().contains("intake_json"));
}

#[tokio::test]
async fn api_generate_requires_intake_json_part() {
    let tmp = tempfile::tempdir().unwrap();
    let app = test_router(tmp.path());

    let body = multipart_body(None, &[("a.txt", "text/plain", b"a")]);
    let resp = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
