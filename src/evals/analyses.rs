//! On-disk analysis folders.
//!
//! An analyses root holds one folder per eval, each with the four files in
//! [`REQUIRED_FILES`].

use crate::{Error, ErrorContext, Result};
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_ANALYSES_DIR: &str = "./analyses";

pub const CREATE_CONFIG: &str = "create.json";
pub const DATA_FILE: &str = "data.jsonl";
pub const PROMPT_FILE: &str = "prompt.txt";
pub const RUN_CONFIG: &str = "run.json";

pub const REQUIRED_FILES: [&str; 4] = [CREATE_CONFIG, DATA_FILE, PROMPT_FILE, RUN_CONFIG];

#[derive(Debug, Clone)]
pub struct AnalysesRoot {
    root: PathBuf,
}

impl AnalysesRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Folder names under the root, sorted. Errors if the root is missing or
    /// holds no folders.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Err(Error::configuration_with_context(
                "analyses folder not found",
                ErrorContext::new().with_field_path(self.root.display().to_string()),
            ));
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        if names.is_empty() {
            return Err(Error::configuration_with_context(
                "no analyses folders found",
                ErrorContext::new().with_field_path(self.root.display().to_string()),
            ));
        }
        names.sort();
        Ok(names)
    }

    /// Open one analysis, checking that every required file exists.
    pub fn open(&self, name: &str) -> Result<Analysis> {
        let mut components = Path::new(name).components();
        let single_folder = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_folder {
            return Err(Error::validation_with_context(
                format!("analysis name '{}' must be a single folder name", name),
                ErrorContext::new()
                    .with_field_path("name")
                    .with_source("analyses"),
            ));
        }
        let dir = self.root.join(name);
        if !dir.is_dir() {
            return Err(Error::configuration_with_context(
                format!("analysis '{}' not found", name),
                ErrorContext::new().with_field_path(dir.display().to_string()),
            ));
        }
        for file in REQUIRED_FILES {
            if !dir.join(file).is_file() {
                return Err(Error::validation_with_context(
                    format!("required file {} not found in {}", file, dir.display()),
                    ErrorContext::new()
                        .with_field_path(file)
                        .with_source("analyses"),
                ));
            }
        }
        Ok(Analysis {
            name: name.to_string(),
            dir,
        })
    }
}

impl Default for AnalysesRoot {
    fn default() -> Self {
        Self::new(DEFAULT_ANALYSES_DIR)
    }
}

/// A checked analysis folder.
#[derive(Debug, Clone)]
pub struct Analysis {
    name: String,
    dir: PathBuf,
}

impl Analysis {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn create_config(&self) -> Result<serde_json::Value> {
        read_json(&self.dir.join(CREATE_CONFIG))
    }

    pub fn run_config(&self) -> Result<serde_json::Value> {
        read_json(&self.dir.join(RUN_CONFIG))
    }

    /// Prompt text with surrounding whitespace trimmed.
    pub fn prompt(&self) -> Result<String> {
        let raw = std::fs::read_to_string(self.dir.join(PROMPT_FILE))?;
        Ok(raw.trim().to_string())
    }

    pub fn data_path(&self) -> PathBuf {
        self.dir.join(DATA_FILE)
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
