//! Submit a prepared intake to the local generator and save `evia_run.zip` here.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use evia_intake::intake::IntakeDocument;
use evia_intake::{
    init_tracing, DirectorySink, HttpTransport, IntakeForm, SelectedFile, SubmitOutcome,
};

/// Post an intake (TOML) plus attachments to the EVIA generator.
#[derive(Debug, Parser)]
#[command(name = "intake_submit", version, long_about = None)]
struct Args {
    /// Intake file: the form fields at top level plus an optional `manual_source`.
    intake: PathBuf,
    /// Files attached to the submission, sent unchanged.
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _ = dotenvy::dotenv();
    init_tracing("evia_intake=info,warn");

    let doc = IntakeDocument::load(&args.intake)?;
    let files = args
        .files
        .iter()
        .map(|p| SelectedFile::from_path(p))
        .collect::<Result<Vec<_>>>()?;

    let transport = HttpTransport::new();
    println!("submitting to {}", transport.endpoint());
    let form = IntakeForm::new(Arc::new(transport), Arc::new(DirectorySink::new(".")));
    form.fill_from(&doc);
    if !files.is_empty() {
        form.select_files(files);
    }

    let outcome = form.submit().await;
    let status = form.state();
    println!("{}", status.message().unwrap_or_default());
    match outcome {
        SubmitOutcome::Succeeded { saved_to } => {
            println!("saved {}", saved_to.display());
            Ok(())
        }
        SubmitOutcome::Failed { error } => Err(error.into()),
        SubmitOutcome::AlreadySubmitting => bail!("a submission is already in flight"),
    }
}
