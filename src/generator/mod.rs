// src/generator/mod.rs
//! R&D run generator behind `POST /generate`.
//!
//! One run = sanitize intake, gate on required fields (S0), walk the middle
//! stages through the stage LLM, pin the fixation block (S5), copy it into
//! the final result (S6), then zip the run directory.

pub mod llm;
pub mod package;
pub mod sanitize;
pub mod stages;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use llm::DynStageLlm;
use sanitize::sanitize_map;
use stages::{
    evia_decision, final_text, load_prompt, readiness_gate, render_markdown, Fixation,
    StageOutput, DECISION_DECLINE, EVIA_COST, FIXATION_KEY, MIDDLE_STAGES,
    OUTPUT_INVALID, STATUS_NOT_READY,
};

/// One piece of supporting material attached to a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl Evidence {
    pub fn file(path: &Path) -> Self {
        Self {
            kind: "file".to_string(),
            value: path.display().to_string(),
        }
    }
}

/// Result of a finished run.
#[derive(Debug, Clone)]
pub struct Run {
    pub run_id: String,
    pub run_dir: PathBuf,
    pub zip_path: PathBuf,
    /// False when the S0 gate stopped the run.
    pub completed: bool,
}

pub struct Generator {
    runs_root: PathBuf,
    prompts_dir: PathBuf,
    llm: DynStageLlm,
}

impl Generator {
    pub fn new(
        runs_root: impl Into<PathBuf>,
        prompts_dir: impl Into<PathBuf>,
        llm: DynStageLlm,
    ) -> Self {
        Self {
            runs_root: runs_root.into(),
            prompts_dir: prompts_dir.into(),
            llm,
        }
    }

    pub fn from_config(cfg: &GeneratorConfig) -> Result<Self> {
        Ok(Self::new(
            cfg.runs_root.clone(),
            cfg.prompts_dir.clone(),
            llm::build_stage_llm(cfg)?,
        ))
    }

    pub fn runs_root(&self) -> &Path {
        &self.runs_root
    }

    fn prompt(&self, stage: &str) -> Result<String> {
        load_prompt(&self.prompts_dir, stage)
    }

    pub async fn generate_run(
        &self,
        raw_intake: Map<String, Value>,
        evidence: Vec<Evidence>,
    ) -> Result<Run> {
        let run_id = new_run_id();
        let run_dir = self.runs_root.join(&run_id);
        tokio::fs::create_dir_all(&run_dir)
            .await
            .with_context(|| format!("creating {}", run_dir.display()))?;
        info!(%run_id, evidence = evidence.len(), dry_run = self.llm.is_dry_run(), "run started");

        let intake = sanitize_map(raw_intake);
        let mut outputs: Vec<StageOutput> = Vec::with_capacity(stages::PIPELINE_ORDER.len());
        let mut context = json!({
            "run_id": run_id,
            "intake": intake,
            "evidence": evidence,
        });

        // S0: readiness gate
        let s0_prompt = self.prompt("0")?;
        let (status, questions) = readiness_gate(&intake);
        let s0_ctx = merged(&context, json!({ "status": status, "questions": questions }));
        let s0_llm = self.llm.complete("0", &s0_prompt, &s0_ctx).await?;
        let s0_data = json!({
            "stage": "0",
            "status": status,
            "questions": questions,
            "intake": intake,
            "evidence": evidence,
            "auto_web": "disabled",
            "llm_output": s0_llm,
            "dry_run": self.llm.is_dry_run(),
            "created_at": Utc::now().to_rfc3339(),
        });
        outputs.push(stage_output("0", &s0_prompt, &s0_llm, s0_data));

        if status == STATUS_NOT_READY {
            info!(%run_id, missing = questions.len(), "run stopped at S0 gate");
            return finish(run_id, run_dir, outputs, None).await;
        }

        let decision = evia_decision(EVIA_COST);
        if decision == DECISION_DECLINE {
            context = merged(&context, json!({ "failure_reason": "EVIA_COST mismatch" }));
        }

        // S1..S4
        for stage in MIDDLE_STAGES {
            let prompt = self.prompt(stage)?;
            let previous = outputs
                .last()
                .map(|o| o.data.clone())
                .unwrap_or(Value::Null);
            let ctx = merged(
                &context,
                json!({
                    "stage": stage,
                    "evia_cost_45_days": EVIA_COST,
                    "evia_decision": decision,
                    "previous_stage": previous,
                }),
            );
            let out = self.llm.complete(stage, &prompt, &ctx).await?;
            debug!(%run_id, stage, "stage done");
            let data = json!({
                "stage": stage,
                "run_id": run_id,
                "evia_cost_45_days": EVIA_COST,
                "evia_decision": decision,
                "llm_output": out,
            });
            outputs.push(stage_output(stage, &prompt, &out, data));
        }

        // S5: fixation
        let fixation = Fixation::build(&run_id, &intake, decision);
        let s5_prompt = self.prompt("5")?;
        let s5_ctx = merged(&context, json!({ "fixation": fixation }));
        let s5_llm = self.llm.complete("5", &s5_prompt, &s5_ctx).await?;
        let mut s5_data = json!({
            "stage": "5",
            "run_id": run_id,
            "evia_cost_45_days": EVIA_COST,
            "llm_output": s5_llm,
        });
        s5_data[FIXATION_KEY] = serde_json::to_value(&fixation)?;
        let s5_md = render_markdown("5", &s5_prompt, &s5_llm, &s5_data) + &fixation.block_text();
        outputs.push(StageOutput {
            stage: "5".to_string(),
            markdown: s5_md,
            data: s5_data,
        });

        // S6: copy of the fixation block, never model text
        let missing = fixation.missing_fields();
        let (s6_text, s6_data) = if missing.is_empty() {
            let text = final_text(&fixation, "OK");
            let data = json!({
                "stage": "6",
                "run_id": run_id,
                "status": "OK",
                "copied_from_fixation": fixation,
                "evia_cost_45_days": fixation.evia_cost_45_days,
                "evia_decision": fixation.evia_decision,
                "llm_output": text,
            });
            (text, data)
        } else {
            let data = json!({
                "stage": "6",
                "run_id": run_id,
                "status": OUTPUT_INVALID,
                "missing_fixation_fields": missing,
                "llm_output": OUTPUT_INVALID,
            });
            (OUTPUT_INVALID.to_string(), data)
        };
        let s6_prompt = self.prompt("6")?;
        outputs.push(stage_output("6", &s6_prompt, &s6_text, s6_data));

        finish(run_id, run_dir, outputs, Some(s6_text)).await
    }
}

/// Write stage files (and the final document for completed runs) and zip the
/// run directory on the blocking pool. `final_text` is `None` for gated runs.
async fn finish(
    run_id: String,
    run_dir: PathBuf,
    outputs: Vec<StageOutput>,
    final_text: Option<String>,
) -> Result<Run> {
    let completed = final_text.is_some();
    let (dir, id) = (run_dir.clone(), run_id.clone());
    let zip_path = tokio::task::spawn_blocking(move || -> Result<PathBuf> {
        if let Some(text) = &final_text {
            package::write_final_document(&dir, "S6 Final", text)?;
        }
        package::persist_outputs(&outputs, &dir)?;
        package::package_outputs(&id, &dir)
    })
    .await
    .context("packaging task failed")??;

    info!(%run_id, zip = %zip_path.display(), completed, "run packaged");
    Ok(Run {
        run_id,
        run_dir,
        zip_path,
        completed,
    })
}

fn stage_output(stage: &str, prompt: &str, llm_output: &str, data: Value) -> StageOutput {
    StageOutput {
        stage: stage.to_string(),
        markdown: render_markdown(stage, prompt, llm_output, &data),
        data,
    }
}

/// Shallow merge of two JSON objects; keys in `extra` win.
fn merged(base: &Value, extra: Value) -> Value {
    let mut out = base.clone();
    if let (Some(dst), Value::Object(src)) = (out.as_object_mut(), extra) {
        dst.extend(src);
    }
    out
}

/// First 12 hex chars of a v4 UUID.
pub fn new_run_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..12].to_string()
}
