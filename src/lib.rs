// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod config;
pub mod download;
pub mod form;
pub mod generator;
pub mod intake;
pub mod landing;
pub mod metrics;
pub mod transport;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::download::{ArtifactSink, DirectorySink, DOWNLOAD_FILE_NAME};
pub use crate::form::{FormState, IntakeForm, SubmitOutcome};
pub use crate::intake::{IntakeField, IntakeRecord, ManualSource, SelectedFile};
pub use crate::transport::{GenerateTransport, HttpTransport, SubmitError, GENERATE_ENDPOINT};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact tracing for bins. `RUST_LOG` wins over `default_filter`.
/// A no-op when a subscriber is already installed (e.g. by the Shuttle runtime).
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}
