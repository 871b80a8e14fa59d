//! # ai-grader-rust
//!
//! 评分器（Grader）远程验证与运行接口的类型化 Rust 客户端。
//!
//! Typed client for remote grader validation/run endpoints.
//!
//! A grader (scoring rubric) is built as a [`GraderSpec`], wrapped in a
//! request envelope and POSTed with a bearer token. Response bodies come back
//! as raw text: nothing is parsed and HTTP status codes are not inspected,
//! so a server-side error is visible only in the returned body.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_grader_rust::{ClientConfig, GraderClient, GraderSpec};
//!
//! #[tokio::main]
//! async fn main() -> ai_grader_rust::Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     let client = GraderClient::new(&config)?;
//!     let grader = GraderSpec::sample_score_model();
//!
//!     println!("validate response: {}", client.validate(&grader).await?);
//!     println!("run response: {}", client.run(&grader, 1.0, "0.9").await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Credential loading and env-overridable defaults |
//! | [`grader`] | Validate and run calls |
//! | [`types`] | Grader definition and request envelopes |
//! | [`transport`] | HTTP transport and the in-memory test transport |
//! | [`workflow`] | The validate-then-run sample flow |
//! | [`evals`] | Eval creation, dataset upload and runs |

pub mod config;
pub mod evals;
pub mod grader;
pub mod transport;
pub mod types;
pub mod workflow;

pub use config::ClientConfig;
pub use grader::GraderClient;
pub use transport::{HttpTransport, Transport};
pub use types::{GraderSpec, RunRequest, ValidateRequest};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
