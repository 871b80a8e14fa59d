//! grader-cli — validate and run graders, and drive evals from analysis folders.
//!
//! Usage:
//!   grader-cli sample                                  Validate then run the sample grader
//!   grader-cli validate [--grader <file>]              Validate a grader
//!   grader-cli run [--grader <file>] --reference-answer <n> --model-sample <s>
//!   grader-cli eval list [--dir <path>]                List analysis folders
//!   grader-cli eval run <name> [--dir <path>] [--eval-id <id>] [--data-id <id>]
//!
//! Responses go to stdout; logs go to stderr (filter with RUST_LOG).

use ai_grader_rust::evals::{analyses::DEFAULT_ANALYSES_DIR, AnalysesRoot, EvalsClient};
use ai_grader_rust::workflow::{self, RUN_LABEL, VALIDATE_LABEL};
use ai_grader_rust::{ClientConfig, GraderClient, GraderSpec, HttpTransport};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grader-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate and run graders against the remote grading service", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate then run the built-in sample grader
    Sample,

    /// Validate a grader definition
    Validate {
        /// Grader file (JSON or YAML); defaults to the sample grader
        #[arg(short, long)]
        grader: Option<PathBuf>,
    },

    /// Run a grader against one reference answer and model sample
    Run {
        /// Grader file (JSON or YAML); defaults to the sample grader
        #[arg(short, long)]
        grader: Option<PathBuf>,

        #[arg(long)]
        reference_answer: f64,

        #[arg(long)]
        model_sample: String,
    },

    /// Manage evals built from analysis folders
    Eval {
        #[command(subcommand)]
        action: EvalAction,
    },
}

#[derive(Subcommand)]
enum EvalAction {
    /// List analysis folders
    List {
        #[arg(long, default_value = DEFAULT_ANALYSES_DIR)]
        dir: PathBuf,
    },

    /// Create (if needed), upload (if needed) and run an analysis
    Run {
        /// Analysis folder name
        name: String,

        #[arg(long, default_value = DEFAULT_ANALYSES_DIR)]
        dir: PathBuf,

        /// Reuse an existing eval instead of creating one
        #[arg(long)]
        eval_id: Option<String>,

        /// Reuse an uploaded dataset instead of uploading data.jsonl
        #[arg(long)]
        data_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Sample => {
            let mut stdout = std::io::stdout().lock();
            workflow::run_sample(
                |key| std::env::var(key).ok(),
                HttpTransport::new,
                &mut stdout,
            )
            .await?;
        }
        Commands::Validate { grader } => {
            let grader = load_grader(grader)?;
            let client = grader_client()?;
            let body = client.validate(&grader).await?;
            println!("{} {}", VALIDATE_LABEL, body);
        }
        Commands::Run {
            grader,
            reference_answer,
            model_sample,
        } => {
            let grader = load_grader(grader)?;
            let client = grader_client()?;
            let body = client.run(&grader, reference_answer, &model_sample).await?;
            println!("{} {}", RUN_LABEL, body);
        }
        Commands::Eval { action } => run_eval(action).await?,
    }

    Ok(())
}

fn grader_client() -> Result<GraderClient> {
    let config = ClientConfig::from_env()?;
    Ok(GraderClient::new(&config)?)
}

fn load_grader(path: Option<PathBuf>) -> Result<GraderSpec> {
    match path {
        Some(path) => GraderSpec::from_path(&path)
            .with_context(|| format!("failed to load grader from {}", path.display())),
        None => Ok(GraderSpec::sample_score_model()),
    }
}

async fn run_eval(action: EvalAction) -> Result<()> {
    match action {
        EvalAction::List { dir } => {
            let root = AnalysesRoot::new(dir);
            let names = root.list()?;
            let mut out = std::io::stdout().lock();
            for (i, name) in names.iter().enumerate() {
                writeln!(out, "{}. {}", i + 1, name)?;
            }
        }
        EvalAction::Run {
            name,
            dir,
            eval_id,
            data_id,
        } => {
            let analysis = AnalysesRoot::new(dir)
                .open(&name)
                .with_context(|| format!("cannot open analysis '{}'", name))?;
            let config = ClientConfig::from_env()?;
            let client = EvalsClient::new(&config)?;
            let result = client.run_analysis(&analysis, eval_id, data_id).await?;

            println!("eval id: {}", result.eval_id);
            println!("data id: {}", result.data_id);
            println!("{}", serde_json::to_string_pretty(&result.run)?);
        }
    }
    Ok(())
}
