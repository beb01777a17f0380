// src/config/generator.rs
use std::env;
use std::path::PathBuf;

pub const ENV_RUNS_ROOT: &str = "RUNS_ROOT";
pub const ENV_PROMPTS_DIR: &str = "PROMPTS_DIR";
pub const ENV_DRY_RUN: &str = "DRY_RUN";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const ENV_UPLOAD_LIMIT_MB: &str = "GENERATE_UPLOAD_LIMIT_MB";

pub const DEFAULT_RUNS_ROOT: &str = "runs";
pub const DEFAULT_PROMPTS_DIR: &str = "prompts";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_UPLOAD_LIMIT_MB: usize = 50;

/// Settings for the generation service. Everything comes from the environment
/// (`.env` is loaded by the binary before this runs).
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Parent of every run directory and of `_uploads/`.
    pub runs_root: PathBuf,
    /// Holds `prompt_0.md` .. `prompt_6.md`.
    pub prompts_dir: PathBuf,
    /// When true no LLM is called; stage text is synthesized locally.
    pub dry_run: bool,
    pub openai_api_key: String,
    pub openai_model: String,
    /// Request body cap for `POST /generate`, in bytes.
    pub upload_limit_bytes: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            runs_root: PathBuf::from(DEFAULT_RUNS_ROOT),
            prompts_dir: PathBuf::from(DEFAULT_PROMPTS_DIR),
            dry_run: true,
            openai_api_key: String::new(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            upload_limit_bytes: DEFAULT_UPLOAD_LIMIT_MB * 1024 * 1024,
        }
    }
}

impl GeneratorConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        let upload_mb = env::var(ENV_UPLOAD_LIMIT_MB)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|mb| *mb > 0)
            .unwrap_or(DEFAULT_UPLOAD_LIMIT_MB);

        Self {
            runs_root: env::var(ENV_RUNS_ROOT).map(PathBuf::from).unwrap_or(d.runs_root),
            prompts_dir: env::var(ENV_PROMPTS_DIR)
                .map(PathBuf::from)
                .unwrap_or(d.prompts_dir),
            // Anything but an explicit "false" keeps dry-run on.
            dry_run: env::var(ENV_DRY_RUN)
                .map(|v| v.trim().to_ascii_lowercase() != "false")
                .unwrap_or(true),
            openai_api_key: env::var(ENV_OPENAI_API_KEY).unwrap_or_default(),
            openai_model: env::var(ENV_OPENAI_MODEL)
                .ok()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(d.openai_model),
            upload_limit_bytes: upload_mb * 1024 * 1024,
        }
    }

    /// Where uploaded evidence files are written.
    pub fn uploads_dir(&self) -> PathBuf {
        self.runs_root.join("_uploads")
    }
}
