// tests/form_flow.rs
//
// Intake form flow against a live in-process generator stub.
// The stub records every multipart part it receives and answers with a
// configurable status/body, so the real reqwest transport is exercised.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Router,
};
use serde_json::Value;
use tokio::sync::Notify;

use evia_intake::download::{Artifact, ArtifactSink};
use evia_intake::transport::{SubmissionPayload, FILES_PART, INTAKE_PART};
use evia_intake::{
    FormState, GenerateTransport, HttpTransport, IntakeField, IntakeForm, SelectedFile,
    SubmitError, SubmitOutcome, DOWNLOAD_FILE_NAME,
};

#[derive(Debug, Clone)]
struct RecordedPart {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: Vec<u8>,
    parts: Arc<Mutex<Vec<RecordedPart>>>,
    hits: Arc<AtomicUsize>,
}

async fn stub_generate(State(stub): State<Stub>, mut mp: Multipart) -> (StatusCode, Vec<u8>) {
    stub.hits.fetch_add(1, Ordering::SeqCst);
    while let Some(field) = mp.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.unwrap().to_vec();
        stub.parts.lock().unwrap().push(RecordedPart {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    (stub.status, stub.body.clone())
}

async fn spawn_stub(status: StatusCode, body: &[u8]) -> (String, Stub) {
    let stub = Stub {
        status,
        body: body.to_vec(),
        parts: Arc::new(Mutex::new(Vec::new())),
        hits: Arc::new(AtomicUsize::new(0)),
    };
    let app = Router::new()
        .route("/generate", post(stub_generate))
        .with_state(stub.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/generate"), stub)
}

/// Keeps saved artifacts in memory instead of touching the filesystem.
#[derive(Default)]
struct MemorySink {
    saved: Mutex<Vec<Artifact>>,
}

impl ArtifactSink for MemorySink {
    fn save(&self, artifact: Artifact) -> anyhow::Result<PathBuf> {
        let path = PathBuf::from(&artifact.file_name);
        self.saved.lock().unwrap().push(artifact);
        Ok(path)
    }
}

fn form_for(endpoint: &str, sink: Arc<MemorySink>) -> IntakeForm {
    IntakeForm::new(Arc::new(HttpTransport::with_endpoint(endpoint)), sink)
}

#[tokio::test]
async fn success_saves_exact_bytes_as_evia_run_zip() {
    let payload = b"PK\x03\x04 generated archive \x00\xff".to_vec();
    let (endpoint, _stub) = spawn_stub(StatusCode::OK, &payload).await;
    let sink = Arc::new(MemorySink::default());
    let form = form_for(&endpoint, sink.clone());

    let out = form.submit().await;

    assert_eq!(
        out,
        SubmitOutcome::Succeeded {
            saved_to: PathBuf::from(DOWNLOAD_FILE_NAME)
        }
    );
    let saved = sink.saved.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].file_name, "evia_run.zip");
    assert_eq!(saved[0].bytes, payload);
    assert!(matches!(form.state(), FormState::Succeeded { .. }));
    assert!(form.state().message().unwrap().contains("evia_run.zip"));
}

#[tokio::test]
async fn http_500_reports_status_and_downloads_nothing() {
    let (endpoint, stub) = spawn_stub(StatusCode::INTERNAL_SERVER_ERROR, b"boom").await;
    let sink = Arc::new(MemorySink::default());
    let form = form_for(&endpoint, sink.clone());

    let out = form.submit().await;

    assert_eq!(
        out,
        SubmitOutcome::Failed {
            error: SubmitError::Http(500)
        }
    );
    let state = form.state();
    assert!(matches!(state, FormState::Failed { .. }));
    assert!(state.message().unwrap().contains("500"), "{state:?}");
    assert!(!state.message().unwrap().contains("boom"), "body must not be parsed");
    assert!(sink.saved.lock().unwrap().is_empty());
    assert_eq!(stub.hits.load(Ordering::SeqCst), 1, "no retry");
}

#[tokio::test]
async fn connection_refused_surfaces_error_text() {
    // Grab a free port, then close it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let sink = Arc::new(MemorySink::default());
    let form = form_for(&format!("http://{addr}/generate"), sink.clone());

    let out = form.submit().await;

    let text = match &out {
        SubmitOutcome::Failed {
            error: SubmitError::Transport(text),
        } => text.clone(),
        other => panic!("expected transport failure, got {other:?}"),
    };
    assert!(!text.is_empty());
    assert!(form.state().message().unwrap().contains(&text));
    assert!(sink.saved.lock().unwrap().is_empty());
}

#[tokio::test]
async fn zero_files_sends_intake_json_only() {
    let (endpoint, stub) = spawn_stub(StatusCode::OK, b"zip").await;
    let form = form_for(&endpoint, Arc::new(MemorySink::default()));
    form.set_field(IntakeField::ProjectName, "EVIA Pilot");
    form.set_field(IntakeField::Goals, "draft");
    form.set_field(IntakeField::Goals, "Сделать MVP");
    form.set_manual_source("https://example.org/brief");
    form.select_files(vec![]);

    form.submit().await;

    let parts = stub.parts.lock().unwrap().clone();
    assert_eq!(parts.len(), 1, "{parts:?}");
    assert_eq!(parts[0].name, INTAKE_PART);
    assert!(parts.iter().all(|p| p.name != FILES_PART));

    let v: Value = serde_json::from_slice(&parts[0].bytes).unwrap();
    assert_eq!(v["project_name"], "EVIA Pilot");
    assert_eq!(v["goals"], "Сделать MVP");
    assert_eq!(v["budget"], "");
    assert_eq!(
        v["manual_sources"],
        serde_json::json!([{ "type": "note", "value": "https://example.org/brief" }])
    );
}

#[tokio::test]
async fn each_file_is_sent_unchanged_under_files() {
    let (endpoint, stub) = spawn_stub(StatusCode::OK, b"zip").await;
    let form = form_for(&endpoint, Arc::new(MemorySink::default()));
    form.select_files(vec![
        SelectedFile::new("brief.txt", b"hello".to_vec(), "text/plain"),
        SelectedFile::new("deck.pdf", b"%PDF-1.7".to_vec(), "application/pdf"),
    ]);

    form.submit().await;

    let parts = stub.parts.lock().unwrap().clone();
    let files: Vec<&RecordedPart> = parts.iter().filter(|p| p.name == FILES_PART).collect();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].file_name.as_deref(), Some("brief.txt"));
    assert_eq!(files[0].content_type.as_deref(), Some("text/plain"));
    assert_eq!(files[0].bytes, b"hello");
    assert_eq!(files[1].file_name.as_deref(), Some("deck.pdf"));
    assert_eq!(files[1].content_type.as_deref(), Some("application/pdf"));
    assert_eq!(files[1].bytes, b"%PDF-1.7");
}

/// Transport that parks inside `send` until released.
#[derive(Default)]
struct Gated {
    calls: AtomicUsize,
    started: Notify,
    release: Notify,
    seen: Mutex<Vec<SubmissionPayload>>,
}

#[async_trait]
impl GenerateTransport for Gated {
    async fn send(&self, payload: SubmissionPayload) -> Result<Vec<u8>, SubmitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(payload);
        self.started.notify_one();
        self.release.notified().await;
        Ok(b"zip".to_vec())
    }
}

#[tokio::test]
async fn second_submit_while_in_flight_sends_nothing() {
    let transport = Arc::new(Gated::default());
    let form = Arc::new(IntakeForm::new(
        transport.clone(),
        Arc::new(MemorySink::default()),
    ));
    form.set_field(IntakeField::CompanyName, "ACME");

    let first = {
        let form = form.clone();
        tokio::spawn(async move { form.submit().await })
    };
    transport.started.notified().await;

    assert_eq!(form.state(), FormState::Submitting);
    assert!(!form.state().can_submit());
    assert_eq!(form.submit().await, SubmitOutcome::AlreadySubmitting);

    // Edits during the flight do not leak into the captured payload.
    form.set_field(IntakeField::CompanyName, "Other Co");
    assert_eq!(form.state(), FormState::Submitting);

    transport.release.notify_one();
    let out = first.await.unwrap();
    assert!(matches!(out, SubmitOutcome::Succeeded { .. }));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

    let seen = transport.seen.lock().unwrap();
    let v: Value = serde_json::from_str(&seen[0].intake_json).unwrap();
    assert_eq!(v["company_name"], "ACME");
    assert_eq!(form.record().company_name, "Other Co");
}

#[tokio::test]
async fn settled_form_is_reusable() {
    let (endpoint, stub) = spawn_stub(StatusCode::OK, b"zip").await;
    let sink = Arc::new(MemorySink::default());
    let form = form_for(&endpoint, sink.clone());

    form.submit().await;
    form.set_field(IntakeField::Timeline, "45 дней");
    assert_eq!(form.state(), FormState::Editing);
    form.submit().await;

    assert_eq!(stub.hits.load(Ordering::SeqCst), 2);
    assert_eq!(sink.saved.lock().unwrap().len(), 2);
}
