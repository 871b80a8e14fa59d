//! 类型模块：评分器定义与请求信封。
//!
//! Typed wire records.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`GraderSpec`] | Scoring rubric sent to the grader endpoints |
//! | [`ValidateRequest`] | `{"grader": ...}` envelope |
//! | [`RunRequest`] | Grader plus one `(item, model_sample)` pair |

pub mod envelope;
pub mod grader;

pub use envelope::{RunItem, RunRequest, ValidateRequest};
pub use grader::{GraderSpec, GraderType, InputMessage, InputRole, ReasoningEffort, SamplingParams};
