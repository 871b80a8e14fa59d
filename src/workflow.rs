//! The sample flow: load credential, validate the sample grader, then run it.

use crate::config::ClientConfig;
use crate::grader::GraderClient;
use crate::transport::Transport;
use crate::types::GraderSpec;
use crate::Result;
use std::io::Write;
use tracing::info;

pub const VALIDATE_LABEL: &str = "validate response:";
pub const RUN_LABEL: &str = "run response:";

/// Reference answer and model sample used by the sample flow.
pub const SAMPLE_REFERENCE_ANSWER: f64 = 1.0;
pub const SAMPLE_MODEL_SAMPLE: &str = "0.9";

/// Run the sample flow end to end.
///
/// The transport is only built after the credential has been loaded, so a
/// missing key fails before any network call is possible.
pub async fn run_sample<L, F, T, W>(lookup: L, make_transport: F, out: &mut W) -> Result<()>
where
    L: Fn(&str) -> Option<String>,
    F: FnOnce(&ClientConfig) -> Result<T>,
    T: Transport,
    W: Write,
{
    let config = ClientConfig::from_lookup(lookup)?;
    info!(base_url = %config.base_url(), "credential loaded");
    let client = GraderClient::with_transport(make_transport(&config)?);
    let grader = GraderSpec::sample_score_model();
    validate_then_run(
        &client,
        &grader,
        SAMPLE_REFERENCE_ANSWER,
        SAMPLE_MODEL_SAMPLE,
        out,
    )
    .await
}

/// Validate `grader`, print the body, then run it and print that body.
///
/// Each line is the fixed label, one space, and the unmodified body.
pub async fn validate_then_run<T, W>(
    client: &GraderClient<T>,
    grader: &GraderSpec,
    reference_answer: f64,
    model_sample: &str,
    out: &mut W,
) -> Result<()>
where
    T: Transport,
    W: Write,
{
    let body = client.validate(grader).await?;
    writeln!(out, "{} {}", VALIDATE_LABEL, body)?;

    let body = client.run(grader, reference_answer, model_sample).await?;
    writeln!(out, "{} {}", RUN_LABEL, body)?;
    Ok(())
}
