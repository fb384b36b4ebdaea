//! Extraction settings.
//!
//! Every knob has a default, so an empty TOML file (or none at all) gives
//! the standard sentence-based behavior. CLI flags are applied on top.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ── Strategy switches ────────────────────────────────────────────────

/// How much text is attached to each date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ContextStrategy {
    /// Enclosing sentence, widened to the paragraph when it is too short.
    #[default]
    Sentence,
    /// Paragraph/bullet-bounded window for lightly cleaned markup.
    #[serde(alias = "markup")]
    #[value(name = "markup")]
    MarkupWindow,
}

/// What happens when a second match normalizes to a date already seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep the context of the earliest mention.
    #[default]
    FirstWins,
    /// Keep whichever mention has the longer context.
    LongestContext,
}

// ── Context extraction ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub strategy: ContextStrategy,
    /// Sentences shorter than this fall back to the enclosing paragraph.
    pub min_sentence_chars: usize,
    /// Markup mode: how far to look on each side of the match.
    pub window_chars: usize,
    /// Markup mode: hard cap on the returned span.
    pub max_span_chars: usize,
    /// Markup mode: spans shorter than this pull in neighbouring paragraphs.
    pub min_span_chars: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        ContextConfig {
            strategy: ContextStrategy::Sentence,
            min_sentence_chars: 50,
            window_chars: 800,
            max_span_chars: 600,
            min_span_chars: 200,
        }
    }
}

// ── Top-level config ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub duplicate_policy: DuplicatePolicy,
    /// Smallest bare four-digit number accepted as a year.
    pub year_min: i32,
    /// Largest bare four-digit number accepted as a year.
    pub year_max: i32,
    /// Characters added on both sides of an accepted match; later matches
    /// starting inside that region are ignored.
    pub region_padding: usize,
    /// Contexts shorter than this are not worth keeping.
    pub min_context_chars: usize,
    pub context: ContextConfig,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            duplicate_policy: DuplicatePolicy::FirstWins,
            year_min: 1000,
            year_max: 2999,
            region_padding: 0,
            min_context_chars: 10,
            context: ContextConfig::default(),
        }
    }
}

impl ExtractConfig {
    /// Settings for raw or lightly cleaned wiki markup, where sentence
    /// punctuation is unreliable and the same date tends to be repeated
    /// in templates right next to the prose.
    pub fn markup() -> Self {
        ExtractConfig {
            duplicate_policy: DuplicatePolicy::LongestContext,
            region_padding: 100,
            context: ContextConfig {
                strategy: ContextStrategy::MarkupWindow,
                ..ContextConfig::default()
            },
            ..ExtractConfig::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: ExtractConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<()> {
        if self.year_min > self.year_max {
            return Err(Error::Config(format!(
                "year_min ({}) is greater than year_max ({})",
                self.year_min, self.year_max
            )));
        }
        if self.context.max_span_chars == 0 {
            return Err(Error::Config("context.max_span_chars must be positive".into()));
        }
        Ok(())
    }
}
