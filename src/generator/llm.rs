// src/generator/llm.rs
//! Stage text providers: a local dry-run stub and the OpenAI Chat Completions client.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::sanitize::MISSING;
use super::stages::EVIA_COST;
use crate::config::GeneratorConfig;

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const SYSTEM_PROMPT: &str =
    "Ты формируешь текст stage-вывода строго по входному prompt и контексту.";

#[async_trait]
pub trait StageLlm: Send + Sync {
    /// Produce the stage text for `prompt` given the JSON `context` object.
    async fn complete(&self, stage: &str, prompt: &str, context: &Value) -> Result<String>;
    /// True when no remote model is involved (recorded in S0 metadata).
    fn is_dry_run(&self) -> bool;
}

pub type DynStageLlm = Arc<dyn StageLlm>;

/// Pick the provider according to `DRY_RUN`.
pub fn build_stage_llm(cfg: &GeneratorConfig) -> Result<DynStageLlm> {
    if cfg.dry_run {
        return Ok(Arc::new(DryRunLlm));
    }
    Ok(Arc::new(OpenAiLlm::new(
        cfg.openai_api_key.clone(),
        cfg.openai_model.clone(),
    )?))
}

/// Deterministic local output; lists the context keys so runs stay inspectable.
pub struct DryRunLlm;

#[async_trait]
impl StageLlm for DryRunLlm {
    async fn complete(&self, stage: &str, _prompt: &str, context: &Value) -> Result<String> {
        let mut keys: Vec<&str> = context
            .as_object()
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        Ok(format!(
            "[DRY_RUN] Stage {stage}\nКраткий результат без внешнего LLM.\nКонтекст содержит поля: {}.",
            keys.join(", ")
        ))
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

pub struct OpenAiLlm {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiLlm {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("evia-intake/0.1")
            .timeout(Duration::from_secs(60))
            .build()
            .context("building OpenAI http client")?;
        Ok(Self {
            http,
            api_key,
            model,
        })
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<Msg<'a>>,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    content: String,
}

#[async_trait]
impl StageLlm for OpenAiLlm {
    async fn complete(&self, stage: &str, prompt: &str, context: &Value) -> Result<String> {
        if self.api_key.is_empty() {
            bail!("OPENAI_API_KEY is required when DRY_RUN=false");
        }

        let user_payload = json!({
            "stage": stage,
            "prompt": prompt,
            "context": context,
            "constraints": {
                "evia_cost_45_days": EVIA_COST,
                "missing_marker": MISSING,
                "no_external_data": true,
            },
        })
        .to_string();

        let req = Req {
            model: &self.model,
            temperature: 0.0,
            messages: vec![
                Msg {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Msg {
                    role: "user",
                    content: &user_payload,
                },
            ],
        };

        let body: Resp = self
            .http
            .post(OPENAI_URL)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .with_context(|| format!("openai request for stage {stage}"))?
            .error_for_status()
            .context("openai non-2xx")?
            .json()
            .await
            .context("openai response body")?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| anyhow!("openai returned no choices for stage {stage}"))
    }

    fn is_dry_run(&self) -> bool {
        false
    }
}
