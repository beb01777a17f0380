//! EVIA generator service: binary entrypoint.
//! Boots the Axum HTTP server: landing page, `/generate`, `/health` and `/metrics`.

use anyhow::Context;
use shuttle_axum::ShuttleAxum;
use tracing::{info, warn};

use evia_intake::config::GeneratorConfig;
use evia_intake::metrics::Metrics;
use evia_intake::{api, init_tracing};

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing("evia_intake=info,warn");

    let cfg = GeneratorConfig::from_env();
    info!(
        runs_root = %cfg.runs_root.display(),
        prompts_dir = %cfg.prompts_dir.display(),
        dry_run = cfg.dry_run,
        key_len = cfg.openai_api_key.len(),
        "generator config loaded"
    );
    std::fs::create_dir_all(&cfg.runs_root).context("creating runs root")?;

    let state = api::AppState::from_config(&cfg)?;
    let mut router = api::router(state);

    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => warn!(error = ?e, "metrics disabled"),
    }

    Ok(router.into())
}
