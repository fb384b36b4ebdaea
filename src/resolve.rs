//! Overlap resolution and deduplication of raw matches.

use crate::config::{DuplicatePolicy, ExtractConfig};
use crate::context::{chars_back, chars_forward, extract_context};
use crate::error::{Error, Result};
use crate::normalize::normalize;
use crate::types::{ContextSpan, DateContextMap, RawMatch};

/// Text already attributed to an accepted match, padding included.
#[derive(Debug, Clone, Copy)]
struct ProcessedRegion {
    start: usize,
    end: usize,
}

impl ProcessedRegion {
    fn covers(&self, offset: usize) -> bool {
        (self.start..self.end).contains(&offset)
    }
}

/// Turn start-ordered raw matches into unique canonical dates with context.
///
/// The result is in acceptance order; sorting is a separate step. Matches
/// that fail to normalize or have too little context are dropped here and
/// never surface as errors.
pub fn resolve(text: &str, matches: &[RawMatch], config: &ExtractConfig) -> DateContextMap {
    let mut map = DateContextMap::new();
    let mut regions: Vec<ProcessedRegion> = Vec::new();

    for m in matches {
        if regions.iter().any(|r| r.covers(m.start)) {
            tracing::trace!(text = %m.text, start = m.start, "inside processed region");
            continue;
        }

        let date = match normalize(&m.text) {
            Ok(date) => date,
            Err(err) => {
                tracing::debug!(pattern = m.pattern.as_str(), %err, "dropping match");
                continue;
            }
        };

        let context = match informative_context(text, m, config) {
            Ok(context) => context,
            Err(err) => {
                tracing::debug!(text = %m.text, %err, "dropping match");
                continue;
            }
        };

        // Marked for repeats too, so a bare year inside a second copy of a
        // full date cannot slip through.
        regions.push(ProcessedRegion {
            start: chars_back(text, m.start, config.region_padding),
            end: chars_forward(text, m.end, config.region_padding),
        });

        let key = date.key();
        let replace = match map.get(&key) {
            None => true,
            Some(existing) => {
                config.duplicate_policy == DuplicatePolicy::LongestContext
                    && context.char_len() > existing.char_len()
            }
        };
        if replace {
            tracing::trace!(%key, start = m.start, "accepted");
            map.insert(key, context);
        }
    }

    map
}

/// Context for `m`, or `InsufficientContext` when it is shorter than
/// `min_context_chars`.
fn informative_context(text: &str, m: &RawMatch, config: &ExtractConfig) -> Result<ContextSpan> {
    let context = extract_context(text, m.start, m.end, &config.context);
    if context.char_len() < config.min_context_chars {
        return Err(Error::InsufficientContext { offset: m.start });
    }
    Ok(context)
}
