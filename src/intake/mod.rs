// src/intake/mod.rs
//! Intake record: the flat set of string fields a user fills in before a run
//! is generated, plus the single manual source note.

pub mod files;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

pub use files::{SelectedFile, SelectedFiles};

/// Tag carried by every manual source entry.
pub const MANUAL_SOURCE_KIND: &str = "note";

/// Names of the intake fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntakeField {
    ProjectName,
    CompanyName,
    ContactName,
    ContactEmail,
    Goals,
    ProblemStatement,
    CurrentSolution,
    TargetAudience,
    Constraints,
    Timeline,
    Budget,
}

impl IntakeField {
    pub const ALL: [IntakeField; 11] = [
        IntakeField::ProjectName,
        IntakeField::CompanyName,
        IntakeField::ContactName,
        IntakeField::ContactEmail,
        IntakeField::Goals,
        IntakeField::ProblemStatement,
        IntakeField::CurrentSolution,
        IntakeField::TargetAudience,
        IntakeField::Constraints,
        IntakeField::Timeline,
        IntakeField::Budget,
    ];

    /// Wire name (the JSON key sent in `intake_json`).
    pub fn as_str(self) -> &'static str {
        match self {
            IntakeField::ProjectName => "project_name",
            IntakeField::CompanyName => "company_name",
            IntakeField::ContactName => "contact_name",
            IntakeField::ContactEmail => "contact_email",
            IntakeField::Goals => "goals",
            IntakeField::ProblemStatement => "problem_statement",
            IntakeField::CurrentSolution => "current_solution",
            IntakeField::TargetAudience => "target_audience",
            IntakeField::Constraints => "constraints",
            IntakeField::Timeline => "timeline",
            IntakeField::Budget => "budget",
        }
    }
}

impl fmt::Display for IntakeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntakeField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntakeField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| anyhow!("unknown intake field: {s}"))
    }
}

/// Every field defaults to an empty string; nothing is validated client-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeRecord {
    pub project_name: String,
    pub company_name: String,
    pub contact_name: String,
    pub contact_email: String,
    pub goals: String,
    pub problem_statement: String,
    pub current_solution: String,
    pub target_audience: String,
    pub constraints: String,
    pub timeline: String,
    pub budget: String,
}

impl IntakeRecord {
    pub fn get(&self, field: IntakeField) -> &str {
        match field {
            IntakeField::ProjectName => &self.project_name,
            IntakeField::CompanyName => &self.company_name,
            IntakeField::ContactName => &self.contact_name,
            IntakeField::ContactEmail => &self.contact_email,
            IntakeField::Goals => &self.goals,
            IntakeField::ProblemStatement => &self.problem_statement,
            IntakeField::CurrentSolution => &self.current_solution,
            IntakeField::TargetAudience => &self.target_audience,
            IntakeField::Constraints => &self.constraints,
            IntakeField::Timeline => &self.timeline,
            IntakeField::Budget => &self.budget,
        }
    }

    /// Overwrite exactly one field (last write wins).
    pub fn set(&mut self, field: IntakeField, value: impl Into<String>) {
        let slot = match field {
            IntakeField::ProjectName => &mut self.project_name,
            IntakeField::CompanyName => &mut self.company_name,
            IntakeField::ContactName => &mut self.contact_name,
            IntakeField::ContactEmail => &mut self.contact_email,
            IntakeField::Goals => &mut self.goals,
            IntakeField::ProblemStatement => &mut self.problem_statement,
            IntakeField::CurrentSolution => &mut self.current_solution,
            IntakeField::TargetAudience => &mut self.target_audience,
            IntakeField::Constraints => &mut self.constraints,
            IntakeField::Timeline => &mut self.timeline,
            IntakeField::Budget => &mut self.budget,
        };
        *slot = value.into();
    }
}

/// A user-supplied note or URL offered instead of automated data collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualSource {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl ManualSource {
    pub fn note(value: impl Into<String>) -> Self {
        Self {
            kind: MANUAL_SOURCE_KIND.to_string(),
            value: value.into(),
        }
    }
}

impl Default for ManualSource {
    fn default() -> Self {
        Self::note("")
    }
}

/// Shape of the `intake_json` multipart field.
///
/// The generator expects `manual_sources` to be an array, so the single
/// in-memory note is always sent as a sequence of one.
#[derive(Debug, Serialize)]
struct IntakeWire<'a> {
    #[serde(flatten)]
    record: &'a IntakeRecord,
    manual_sources: [&'a ManualSource; 1],
}

/// Serialize the record and its manual source into the `intake_json` text.
pub fn to_intake_json(record: &IntakeRecord, source: &ManualSource) -> serde_json::Result<String> {
    serde_json::to_string(&IntakeWire {
        record,
        manual_sources: [source],
    })
}

/// Intake prepared offline as TOML: the record's fields at top level plus an
/// optional `manual_source` note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IntakeDocument {
    #[serde(flatten)]
    pub record: IntakeRecord,
    #[serde(default)]
    pub manual_source: String,
}

impl IntakeDocument {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading intake from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing {}", path.display()))
    }
}
