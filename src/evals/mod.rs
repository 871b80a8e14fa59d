//! 评测模块：基于分析目录创建评测、上传数据集并启动运行。
//!
//! Evals: create an eval from an analysis folder, upload its dataset and
//! start a run.

pub mod analyses;
mod client;

pub use analyses::{AnalysesRoot, Analysis};
pub use client::{build_run_body, run_path, AnalysisRun, EvalsClient, EVALS_PATH, FILES_PATH, FILE_PURPOSE};
