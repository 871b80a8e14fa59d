//! 评分器模块：验证评分规则，或针对单个样本运行评分。
//!
//! Grader endpoints: validate a rubric, or run it against one sample.

mod client;

pub use client::{GraderClient, RUN_PATH, VALIDATE_PATH};
