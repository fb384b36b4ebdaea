//! Text in, ordered date → context mapping out.
//!
//! Matcher, resolver and sorter run in sequence over one string. Nothing is
//! shared between calls, so one `Extractor` can serve many texts, from many
//! threads.

use serde::Serialize;

use crate::config::ExtractConfig;
use crate::error::Result;
use crate::matcher::find_all;
use crate::patterns::PatternLibrary;
use crate::resolve::resolve;
use crate::sort::sort_chronologically;
use crate::types::DateContextMap;

/// Result of one extraction call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    /// Canonical date → context, oldest first.
    pub dates: DateContextMap,
    /// Pattern hits before overlap resolution.
    pub raw_matches: usize,
    /// Unique dates kept.
    pub dates_found: usize,
    /// Input length in characters.
    pub text_length: usize,
}

impl Extraction {
    fn empty(text_length: usize) -> Self {
        Extraction {
            dates: DateContextMap::new(),
            raw_matches: 0,
            dates_found: 0,
            text_length,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractConfig,
    library: PatternLibrary,
}

impl Extractor {
    pub fn new(config: ExtractConfig) -> Result<Self> {
        config.validate()?;
        let library = PatternLibrary::from_config(&config);
        Ok(Extractor { config, library })
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    pub fn extract(&self, text: &str) -> Extraction {
        let text_length = text.chars().count();
        if text.trim().is_empty() {
            return Extraction::empty(text_length);
        }

        let matches = find_all(text, &self.library);
        let resolved = resolve(text, &matches, &self.config);
        let dates = sort_chronologically(resolved);

        tracing::debug!(
            text_length,
            raw_matches = matches.len(),
            dates_found = dates.len(),
            "extraction done"
        );

        Extraction {
            dates_found: dates.len(),
            raw_matches: matches.len(),
            dates,
            text_length,
        }
    }
}

/// Extract with the default sentence-based settings.
pub fn extract(text: &str) -> Extraction {
    Extractor::default().extract(text)
}
