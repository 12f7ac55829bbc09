use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "QA_CLEANER";

/// Byline shape on profile pages: "Name + credential · date ·", where date is
/// "5y", "3mo", "2w" or "Jan 15".
pub const DEFAULT_AUTHOR_PATTERN: &str = r"[A-Z][^·]{5,50}·(?:\d+(?:mo|[ymwdh])|[A-Z][a-z]{2} \d+)·?";

/// Tunables for the cleaning pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CleanerConfig {
    /// A question must be strictly longer than this many characters.
    pub min_question_chars: usize,
    /// An answer must be strictly longer than this many characters.
    pub min_answer_chars: usize,
    /// Regex for author bylines. Case-sensitive unless it carries `(?i)`.
    pub author_pattern: String,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        CleanerConfig {
            min_question_chars: 20,
            min_answer_chars: 10,
            author_pattern: DEFAULT_AUTHOR_PATTERN.to_string(),
        }
    }
}

impl CleanerConfig {
    /// Defaults, then the optional config file, then `QA_CLEANER_*` env vars.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(file, ENV_PREFIX)
    }

    fn load_with_prefix(file: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let defaults = CleanerConfig::default();
        let mut builder = Config::builder()
            .set_default("min_question_chars", defaults.min_question_chars as i64)?
            .set_default("min_answer_chars", defaults.min_answer_chars as i64)?
            .set_default("author_pattern", defaults.author_pattern)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(Environment::with_prefix(env_prefix).try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize())
            .context("Failed to load cleaner configuration")
    }

    /// Apply explicit command-line overrides on top of the loaded values.
    pub fn with_overrides(mut self, min_question: Option<usize>, min_answer: Option<usize>) -> Self {
        if let Some(n) = min_question {
            self.min_question_chars = n;
        }
        if let Some(n) = min_answer {
            self.min_answer_chars = n;
        }
        self
    }
}
