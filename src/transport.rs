// src/transport.rs
//! Outbound leg of the intake flow: multipart payload + POST to the generator.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tracing::debug;

use crate::intake::SelectedFile;

/// Fixed generation endpoint the intake form posts to.
pub const GENERATE_ENDPOINT: &str = "http://localhost:8000/generate";
/// Multipart field carrying the serialized intake record.
pub const INTAKE_PART: &str = "intake_json";
/// Multipart field repeated once per selected file.
pub const FILES_PART: &str = "files";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Server answered with a non-success status; the body is not inspected.
    #[error("HTTP {0}")]
    Http(u16),
    /// No response at all (refused, DNS, offline...). Text is the underlying error's.
    #[error("{0}")]
    Transport(String),
    #[error("could not encode payload: {0}")]
    Encode(String),
    #[error("could not save archive: {0}")]
    Save(String),
}

/// Everything one submission sends, captured at the moment `submit()` starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub intake_json: String,
    pub files: Vec<SelectedFile>,
}

impl SubmissionPayload {
    /// Field names in the order they are appended to the multipart body.
    pub fn part_names(&self) -> Vec<&'static str> {
        let mut names = Vec::with_capacity(1 + self.files.len());
        names.push(INTAKE_PART);
        names.extend(self.files.iter().map(|_| FILES_PART));
        names
    }

    /// Build the multipart form. Boundary and content type are left to reqwest.
    pub fn into_form(self) -> Result<Form, SubmitError> {
        let mut form = Form::new().text(INTAKE_PART, self.intake_json);
        for file in self.files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.media_type)
                .map_err(|e| SubmitError::Encode(e.to_string()))?;
            form = form.part(FILES_PART, part);
        }
        Ok(form)
    }
}

/// Seam between the form state machine and the network.
#[async_trait]
pub trait GenerateTransport: Send + Sync {
    /// Send one payload; on 2xx return the whole response body.
    async fn send(&self, payload: SubmissionPayload) -> Result<Vec<u8>, SubmitError>;
}

/// reqwest-backed transport. No retries and no client-side timeout.
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::with_endpoint(GENERATE_ENDPOINT)
    }

    /// Point at another generator (integration tests bind an ephemeral port).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerateTransport for HttpTransport {
    async fn send(&self, payload: SubmissionPayload) -> Result<Vec<u8>, SubmitError> {
        let files = payload.files.len();
        let form = payload.into_form()?;
        debug!(endpoint = %self.endpoint, files, "posting intake");

        let resp = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SubmitError::Http(status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;
        Ok(body.to_vec())
    }
}
