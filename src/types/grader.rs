//! Grader (scoring rubric) definition.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Grading strategy tag, serialized as the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum GraderType {
    /// A model scores the sample numerically within `range`.
    ScoreModel,
}

/// Role of a rubric message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputRole {
    System,
    Developer,
    User,
    Assistant,
}

/// One message of the rubric prompt. `content` may contain template
/// placeholders such as `{{ item.reference_answer }}`, which are resolved
/// server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputMessage {
    pub role: InputRole,
    pub content: String,
}

impl InputMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: InputRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: InputRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Low,
    Medium,
    High,
}

/// Generation knobs for the backing model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub top_p: f64,
    pub reasoning_effort: ReasoningEffort,
}

/// A scoring rubric sent to the grader endpoints.
///
/// Built once and shared by reference between the validate and run calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraderSpec {
    #[serde(rename = "type")]
    pub grader_type: GraderType,
    pub name: String,
    pub input: Vec<InputMessage>,
    pub pass_threshold: f64,
    pub model: String,
    pub range: [f64; 2],
    pub sampling_params: SamplingParams,
}

impl GraderSpec {
    /// The fixed illustrative `score_model` grader.
    pub fn sample_score_model() -> Self {
        Self {
            grader_type: GraderType::ScoreModel,
            name: "my_score_model".to_string(),
            input: vec![
                InputMessage::system(
                    "You are an expert grader. If the reference and model answer are exact \
                     matches, output a score of 1. If they are somewhat similar in meaning, \
                     output a score in 0.5. Otherwise, give a score of 0.",
                ),
                InputMessage::user(
                    "Reference: {{ item.reference_answer }}. Model answer: {{ sample.output_text }}",
                ),
            ],
            pass_threshold: 0.5,
            model: "o3-mini-2024-01-31".to_string(),
            range: [0.0, 1.0],
            sampling_params: SamplingParams {
                max_tokens: 32768,
                top_p: 1.0,
                reasoning_effort: ReasoningEffort::Medium,
            },
        }
    }

    /// Load a grader from a JSON or YAML file (by extension) and check it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);
        let grader: GraderSpec = if is_yaml {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        grader.check()?;
        Ok(grader)
    }

    /// Local structural checks. The remote validate call remains authoritative.
    pub fn check(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(invalid("grader name must not be empty", "grader.name"));
        }
        if self.input.is_empty() {
            return Err(invalid("grader input must contain at least one message", "grader.input"));
        }
        let [low, high] = self.range;
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(invalid(
                format!("range must be increasing, got [{}, {}]", low, high),
                "grader.range",
            ));
        }
        if !(low..=high).contains(&self.pass_threshold) {
            return Err(invalid(
                format!("pass_threshold {} is outside range", self.pass_threshold),
                "grader.pass_threshold",
            ));
        }
        let top_p = self.sampling_params.top_p;
        if !(top_p > 0.0 && top_p <= 1.0) {
            return Err(invalid(
                format!("top_p must be in (0, 1], got {}", top_p),
                "grader.sampling_params.top_p",
            ));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>, field: &str) -> Error {
    Error::validation_with_context(
        msg,
        ErrorContext::new().with_field_path(field).with_source("grader"),
    )
}
