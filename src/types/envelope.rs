//! Request envelopes for the grader endpoints.
//!
//! Envelopes borrow the grader instead of owning a copy, so every request of
//! one flow serializes the very same rubric.

use super::grader::GraderSpec;
use serde::{Deserialize, Serialize};

/// Body of the validate call: `{"grader": ...}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ValidateRequest<'a> {
    pub grader: &'a GraderSpec,
}

impl<'a> ValidateRequest<'a> {
    pub fn new(grader: &'a GraderSpec) -> Self {
        Self { grader }
    }
}

/// Dataset row the grader templates read from (`{{ item.* }}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunItem {
    pub reference_answer: f64,
}

/// Body of the run call.
#[derive(Debug, Clone, Serialize)]
pub struct RunRequest<'a> {
    pub grader: &'a GraderSpec,
    pub item: RunItem,
    pub model_sample: String,
}

impl<'a> RunRequest<'a> {
    pub fn new(grader: &'a GraderSpec, reference_answer: f64, model_sample: impl Into<String>) -> Self {
        Self {
            grader,
            item: RunItem { reference_answer },
            model_sample: model_sample.into(),
        }
    }
}
