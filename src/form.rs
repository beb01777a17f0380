// src/form.rs
//! Intake form flow: Editing -> Submitting -> {Succeeded, Failed} -> Editing.
//!
//! The form owns the intake record, the manual source and the file
//! selection. `submit()` snapshots them, posts through a `GenerateTransport`
//! and hands a successful body to an `ArtifactSink`. Only one submission can
//! be in flight per form.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::download::{Artifact, ArtifactSink, DOWNLOAD_FILE_NAME};
use crate::intake::{
    to_intake_json, IntakeDocument, IntakeField, IntakeRecord, ManualSource, SelectedFile,
    SelectedFiles,
};
use crate::transport::{GenerateTransport, SubmissionPayload, SubmitError};

pub type DynTransport = Arc<dyn GenerateTransport>;
pub type DynSink = Arc<dyn ArtifactSink>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Editing,
    Submitting,
    Succeeded { message: String, saved_to: PathBuf },
    Failed { message: String },
}

impl FormState {
    /// Status line shown under the submit control, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            FormState::Editing => None,
            FormState::Submitting => Some("Generating..."),
            FormState::Succeeded { message, .. } | FormState::Failed { message } => Some(message),
        }
    }

    /// The submit control is disabled while a request is in flight.
    pub fn can_submit(&self) -> bool {
        !matches!(self, FormState::Submitting)
    }
}

/// What a single `submit()` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Succeeded { saved_to: PathBuf },
    Failed { error: SubmitError },
    /// Another submission was already in flight; nothing was sent.
    AlreadySubmitting,
}

#[derive(Debug, Default)]
struct FormData {
    record: IntakeRecord,
    manual_source: ManualSource,
    files: SelectedFiles,
    state: FormState,
}

impl FormData {
    /// A settled form goes back to editing on the next interaction.
    fn touch(&mut self) {
        if matches!(
            self.state,
            FormState::Succeeded { .. } | FormState::Failed { .. }
        ) {
            self.state = FormState::Editing;
        }
    }

    fn payload(&self) -> Result<SubmissionPayload, SubmitError> {
        let intake_json = to_intake_json(&self.record, &self.manual_source)
            .map_err(|e| SubmitError::Encode(e.to_string()))?;
        Ok(SubmissionPayload {
            intake_json,
            files: self.files.clone().unwrap_or_default(),
        })
    }
}

pub struct IntakeForm {
    data: Mutex<FormData>,
    transport: DynTransport,
    sink: DynSink,
}

impl IntakeForm {
    pub fn new(transport: DynTransport, sink: DynSink) -> Self {
        Self {
            data: Mutex::new(FormData::default()),
            transport,
            sink,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormData> {
        // A panic while holding the lock cannot leave FormData half-written.
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> FormState {
        self.lock().state.clone()
    }

    pub fn record(&self) -> IntakeRecord {
        self.lock().record.clone()
    }

    pub fn manual_source(&self) -> ManualSource {
        self.lock().manual_source.clone()
    }

    /// The wire shape: always exactly one element.
    pub fn manual_sources(&self) -> Vec<ManualSource> {
        vec![self.manual_source()]
    }

    pub fn files(&self) -> SelectedFiles {
        self.lock().files.clone()
    }

    pub fn set_field(&self, field: IntakeField, value: impl Into<String>) {
        let mut d = self.lock();
        d.record.set(field, value);
        d.touch();
    }

    /// String-keyed variant for callers that only have the wire name.
    pub fn set_field_by_name(&self, name: &str, value: impl Into<String>) -> anyhow::Result<()> {
        let field: IntakeField = name.parse()?;
        self.set_field(field, value);
        Ok(())
    }

    /// Copy every field of a prepared document into the form, one edit per field.
    pub fn fill_from(&self, doc: &IntakeDocument) {
        for field in IntakeField::ALL {
            self.set_field(field, doc.record.get(field));
        }
        self.set_manual_source(doc.manual_source.as_str());
    }

    pub fn set_manual_source(&self, value: impl Into<String>) {
        let mut d = self.lock();
        d.manual_source.value = value.into();
        d.touch();
    }

    /// Replace the selection wholesale. No size or type filtering.
    pub fn select_files(&self, files: Vec<SelectedFile>) {
        let mut d = self.lock();
        d.files = Some(files);
        d.touch();
    }

    pub fn clear_files(&self) {
        let mut d = self.lock();
        d.files = None;
        d.touch();
    }

    /// Run one submission. Never returns an error: failures land in `FormState::Failed`.
    pub async fn submit(&self) -> SubmitOutcome {
        let payload = {
            let mut d = self.lock();
            if d.state == FormState::Submitting {
                debug!("submit ignored: already in flight");
                return SubmitOutcome::AlreadySubmitting;
            }
            match d.payload() {
                Ok(p) => {
                    d.state = FormState::Submitting;
                    p
                }
                Err(error) => {
                    d.state = FormState::Failed {
                        message: failure_message(&error),
                    };
                    return SubmitOutcome::Failed { error };
                }
            }
        };

        info!(files = payload.files.len(), "intake submission started");
        let result = self.exchange(payload).await;

        let mut d = self.lock();
        match result {
            Ok(saved_to) => {
                info!(path = %saved_to.display(), "intake archive saved");
                d.state = FormState::Succeeded {
                    message: format!("Done: archive downloaded as {DOWNLOAD_FILE_NAME}"),
                    saved_to: saved_to.clone(),
                };
                SubmitOutcome::Succeeded { saved_to }
            }
            Err(error) => {
                warn!(%error, "intake submission failed");
                d.state = FormState::Failed {
                    message: failure_message(&error),
                };
                SubmitOutcome::Failed { error }
            }
        }
    }

    async fn exchange(&self, payload: SubmissionPayload) -> Result<PathBuf, SubmitError> {
        let body = self.transport.send(payload).await?;
        self.sink
            .save(Artifact::archive(body))
            .map_err(|e| SubmitError::Save(format!("{e:#}")))
    }
}

fn failure_message(error: &SubmitError) -> String {
    format!("Error: {error}")
}
