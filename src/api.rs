use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::{counter, histogram};
use serde_json::{Map, Value};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::config::GeneratorConfig;
use crate::generator::{Evidence, Generator};
use crate::intake::MANUAL_SOURCE_KIND;
use crate::landing::{self, MenuState};
use crate::metrics::ensure_metrics_described;
use crate::transport::{FILES_PART, INTAKE_PART};

#[derive(Clone)]
pub struct AppState {
    generator: Arc<Generator>,
    uploads_dir: PathBuf,
    upload_limit_bytes: usize,
}

impl AppState {
    pub fn new(
        generator: Generator,
        uploads_dir: impl Into<PathBuf>,
        upload_limit_bytes: usize,
    ) -> Self {
        Self {
            generator: Arc::new(generator),
            uploads_dir: uploads_dir.into(),
            upload_limit_bytes,
        }
    }

    pub fn from_config(cfg: &GeneratorConfig) -> anyhow::Result<Self> {
        Ok(Self::new(
            Generator::from_config(cfg)?,
            cfg.uploads_dir(),
            cfg.upload_limit_bytes,
        ))
    }
}

pub fn router(state: AppState) -> Router {
    ensure_metrics_described();
    let limit = state.upload_limit_bytes;

    Router::new()
        .route("/", get(landing_page))
        .route("/health", get(health))
        .route("/generate", post(generate))
        .layer(DefaultBodyLimit::max(limit))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct LandingQuery {
    #[serde(default)]
    menu: MenuState,
}

async fn landing_page(Query(q): Query<LandingQuery>) -> Html<String> {
    Html(landing::render_page(q.menu))
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Handler-boundary error: status code + short message rendered as JSON.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(err: anyhow::Error) -> Self {
        error!(error = ?err, "generation failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

async fn generate(State(state): State<AppState>, multipart: Multipart) -> Response {
    counter!("generate_requests_total").increment(1);
    let started = Instant::now();

    let result = handle_generate(&state, multipart).await;
    histogram!("generate_duration_ms").record(started.elapsed().as_secs_f64() * 1000.0);

    match result {
        Ok(resp) => resp,
        Err(e) => {
            counter!("generate_failures_total").increment(1);
            e.into_response()
        }
    }
}

async fn handle_generate(state: &AppState, mut multipart: Multipart) -> Result<Response, ApiError> {
    let mut intake_json: Option<String> = None;
    let mut evidence: Vec<Evidence> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(INTAKE_PART) => intake_json = Some(field.text().await?),
            Some(FILES_PART) => {
                let file_name = upload_name(field.file_name());
                let bytes = field.bytes().await?;
                let target = store_upload(&state.uploads_dir, &file_name, &bytes)
                    .await
                    .map_err(ApiError::internal)?;
                evidence.push(Evidence::file(&target));
            }
            other => warn!(field = ?other, "ignoring unexpected multipart field"),
        }
    }

    let raw = intake_json.ok_or_else(|| ApiError::bad_request("missing intake_json field"))?;
    let intake: Map<String, Value> = serde_json::from_str(&raw)
        .map_err(|e| ApiError::bad_request(format!("intake_json is not a JSON object: {e}")))?;
    evidence.extend(manual_evidence(&intake));

    let run = state
        .generator
        .generate_run(intake, evidence)
        .await
        .map_err(ApiError::internal)?;
    if run.completed {
        counter!("generate_runs_completed_total").increment(1);
    }

    let bytes = tokio::fs::read(&run.zip_path)
        .await
        .map_err(|e| ApiError::internal(e.into()))?;
    info!(run_id = %run.run_id, bytes = bytes.len(), "archive sent");

    let disposition = format!("attachment; filename=\"evia_run_{}.zip\"", run.run_id);
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// `manual_sources` entries become evidence; missing keys fall back to a blank note.
fn manual_evidence(intake: &Map<String, Value>) -> Vec<Evidence> {
    let Some(Value::Array(items)) = intake.get("manual_sources") else {
        return Vec::new();
    };
    items
        .iter()
        .map(|s| Evidence {
            kind: s
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or(MANUAL_SOURCE_KIND)
                .to_string(),
            value: s
                .get("value")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
        .collect()
}

/// Client file names are reduced to their last component so uploads stay in `_uploads/`.
fn upload_name(client_name: Option<&str>) -> String {
    client_name
        .map(|n| n.rsplit(['/', '\\']).next().unwrap_or_default().trim())
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
        .unwrap_or("upload.bin")
        .to_string()
}

async fn store_upload(dir: &Path, name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let target = dir.join(name);
    tokio::fs::write(&target, bytes).await?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upload_names_cannot_escape_the_uploads_dir() {
        assert_eq!(upload_name(Some("../../etc/passwd")), "passwd");
        assert_eq!(upload_name(Some("C:\\Users\\me\\deck.pdf")), "deck.pdf");
        assert_eq!(upload_name(Some("..")), "upload.bin");
        assert_eq!(upload_name(Some("")), "upload.bin");
        assert_eq!(upload_name(None), "upload.bin");
        assert_eq!(upload_name(Some("brief.md")), "brief.md");
    }

    #[test]
    fn manual_sources_default_to_blank_notes() {
        let intake = json!({
            "manual_sources": [
                { "type": "note", "value": "https://evia.ai" },
                { "value": "no tag" },
                {}
            ]
        });
        let ev = manual_evidence(intake.as_object().unwrap());
        assert_eq!(ev.len(), 3);
        assert_eq!(ev[0].value, "https://evia.ai");
        assert_eq!(ev[1].kind, "note");
        assert_eq!(ev[2].value, "");
    }

    #[test]
    fn no_manual_sources_no_evidence() {
        assert!(manual_evidence(&Map::new()).is_empty());
    }
}
