// src/generator/stages.rs
//! Stage catalogue, the S0 readiness gate, the S5 fixation block and the S6 final text.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};

use super::sanitize::{field_text, MISSING};

/// Fixed price of a 45-day EVIA engagement.
pub const EVIA_COST: &str = "150 000 ₽";

pub const PIPELINE_ORDER: [&str; 10] = ["0", "1", "2", "3", "3.5", "3.6", "3.7", "4", "5", "6"];

/// Stages between the gate and the fixation stage.
pub const MIDDLE_STAGES: [&str; 7] = ["1", "2", "3", "3.5", "3.6", "3.7", "4"];

pub const STATUS_READY: &str = "ГОТОВО";
pub const STATUS_NOT_READY: &str = "НЕ ГОТОВО";
pub const DECISION_TAKE: &str = "БЕРЁМ";
pub const DECISION_DECLINE: &str = "НЕ БЕРЁМ";
pub const FIXATION_KEY: &str = "(10) БЛОК ФИКСАЦИИ";
pub const OUTPUT_INVALID: &str = "OUTPUT INVALID";
pub const FINAL_HEADING: &str = "Финальный результат EVIA R&D";

/// Fields the S0 gate insists on.
pub const REQUIRED_FIELDS: [&str; 4] =
    ["project_name", "company_name", "goals", "problem_statement"];
const MAX_QUESTIONS: usize = 7;

#[derive(Debug, Clone)]
pub struct StageOutput {
    pub stage: String,
    pub markdown: String,
    pub data: Value,
}

impl StageOutput {
    /// `3.5` -> `3_5`, used in file names.
    pub fn tag(&self) -> String {
        stage_tag(&self.stage)
    }
}

pub fn stage_tag(stage: &str) -> String {
    stage.replace('.', "_")
}

pub fn prompt_file(stage: &str) -> Result<String> {
    if !PIPELINE_ORDER.contains(&stage) {
        bail!("unknown stage {stage}");
    }
    Ok(format!("prompt_{}.md", stage_tag(stage)))
}

pub fn load_prompt(prompts_dir: &Path, stage: &str) -> Result<String> {
    let path = prompts_dir.join(prompt_file(stage)?);
    fs::read_to_string(&path).with_context(|| format!("reading prompt {}", path.display()))
}

/// S0 gate: one clarifying question per missing required field (at most seven).
pub fn readiness_gate(intake: &Map<String, Value>) -> (&'static str, Vec<String>) {
    let missing: Vec<&str> = REQUIRED_FIELDS
        .into_iter()
        .filter(|f| field_text(intake, f) == MISSING)
        .collect();
    if missing.is_empty() {
        return (STATUS_READY, Vec::new());
    }
    let questions = missing
        .iter()
        .take(MAX_QUESTIONS)
        .map(|f| format!("Уточните поле '{f}' для продолжения."))
        .collect();
    (STATUS_NOT_READY, questions)
}

pub fn evia_decision(cost: &str) -> &'static str {
    if cost == EVIA_COST {
        DECISION_TAKE
    } else {
        DECISION_DECLINE
    }
}

/// Values pinned by S5 that S6 must reproduce verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fixation {
    pub run_id: String,
    pub evia_cost_45_days: String,
    pub evia_decision: String,
    pub project_name: String,
    pub company_name: String,
    pub goals: String,
    pub problem_statement: String,
}

impl Fixation {
    pub fn build(run_id: &str, intake: &Map<String, Value>, decision: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            evia_cost_45_days: EVIA_COST.to_string(),
            evia_decision: decision.to_string(),
            project_name: field_text(intake, "project_name"),
            company_name: field_text(intake, "company_name"),
            goals: field_text(intake, "goals"),
            problem_statement: field_text(intake, "problem_statement"),
        }
    }

    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("run_id", self.run_id.as_str()),
            ("evia_cost_45_days", self.evia_cost_45_days.as_str()),
            ("evia_decision", self.evia_decision.as_str()),
            ("project_name", self.project_name.as_str()),
            ("company_name", self.company_name.as_str()),
            ("goals", self.goals.as_str()),
            ("problem_statement", self.problem_statement.as_str()),
        ]
    }

    /// Names of entries that came out empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.entries()
            .into_iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(k, _)| k)
            .collect()
    }

    /// `key: value` lines appended to the S5 markdown.
    pub fn block_text(&self) -> String {
        let lines: Vec<String> = self
            .entries()
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect();
        format!("\n{FIXATION_KEY}\n{}", lines.join("\n"))
    }
}

/// S6 body, built only from the fixation block.
pub fn final_text(fixation: &Fixation, status: &str) -> String {
    format!(
        "{FINAL_HEADING}\n\n\
         status: {status}\n\
         run_id: {}\n\
         project_name: {}\n\
         company_name: {}\n\
         goals: {}\n\
         problem_statement: {}\n\
         evia_decision: {}\n\
         evia_cost_45_days: {}",
        fixation.run_id,
        fixation.project_name,
        fixation.company_name,
        fixation.goals,
        fixation.problem_statement,
        fixation.evia_decision,
        fixation.evia_cost_45_days,
    )
}

pub fn render_markdown(stage: &str, prompt: &str, llm_output: &str, data: &Value) -> String {
    let meta = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
    format!(
        "# S{stage}\n\n## Prompt source\n\n```md\n{prompt}\n```\n\n## LLM output\n\n{llm_output}\n\n## Metadata\n\n```json\n{meta}\n```\n"
    )
}
