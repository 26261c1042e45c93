//! Converter configuration
//!
//! Loaded from an optional YAML file; every key has a default.
//!
//! ```yaml
//! workers: 4
//! task_timeout_secs: 120
//! target_dir_name: impexes
//! extensions: [xlsx, xls]
//! malformed_keys: abort
//! strict_columns: true
//! ```

use crate::converter::ConvertOptions;
use crate::error::{ImpexError, ImpexResult};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// What to do with a key row whose key rectifies to nothing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedKeyPolicy {
    /// Drop the row, log it, keep converting the file
    #[default]
    Skip,
    /// Fail the whole file
    Abort,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImpexConfig {
    /// Concurrent conversions in batch mode; `None` uses available parallelism
    pub workers: Option<usize>,
    pub task_timeout_secs: u64,
    /// Batch output directory, created inside the source directory
    pub target_dir_name: String,
    /// Recognized spreadsheet extensions (case-insensitive, without dot)
    pub extensions: Vec<String>,
    pub malformed_keys: MalformedKeyPolicy,
    pub strict_columns: bool,
}

impl Default for ImpexConfig {
    fn default() -> Self {
        Self {
            workers: None,
            task_timeout_secs: 300,
            target_dir_name: "impexes".to_string(),
            extensions: ["xlsx", "xlsm", "xlsb", "xls", "ods"]
                .into_iter()
                .map(String::from)
                .collect(),
            malformed_keys: MalformedKeyPolicy::Skip,
            strict_columns: false,
        }
    }
}

impl ImpexConfig {
    /// Load and validate a YAML configuration file
    pub fn load(path: &Path) -> ImpexResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ImpexResult<Self> {
        // An empty document deserializes to unit, not a mapping
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ImpexResult<()> {
        if self.workers == Some(0) {
            return Err(ImpexError::Config("workers must be at least 1".to_string()));
        }
        if self.task_timeout_secs == 0 {
            return Err(ImpexError::Config(
                "task_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.extensions.is_empty() {
            return Err(ImpexError::Config(
                "extensions must list at least one spreadsheet extension".to_string(),
            ));
        }
        let name = &self.target_dir_name;
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(ImpexError::Config(format!(
                "target_dir_name must be a plain directory name, got '{}'",
                name
            )));
        }
        Ok(())
    }

    pub fn workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    pub fn task_timeout(&self) -> Duration {
        Duration::from_secs(self.task_timeout_secs)
    }

    /// Whether `path` has one of the configured spreadsheet extensions and is
    /// not an Office lock file (`~$name.xlsx`)
    pub fn is_spreadsheet(&self, path: &Path) -> bool {
        let is_lock_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("~$"));
        if is_lock_file {
            return false;
        }

        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }

    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            malformed_keys: self.malformed_keys,
            strict_columns: self.strict_columns,
        }
    }
}
