use crate::patterns::PatternLibrary;
use crate::types::RawMatch;

/// Run every pattern over `text`.
///
/// Each pattern contributes its own leftmost, non-overlapping matches;
/// matches from different patterns may overlap. The result is ordered by
/// start offset, then by pattern priority.
pub fn find_all(text: &str, library: &PatternLibrary) -> Vec<RawMatch> {
    let mut matches = Vec::new();

    for pattern in library.patterns() {
        for m in pattern.regex.find_iter(text) {
            if !library.admits(pattern.id, text, m.start(), m.end()) {
                continue;
            }
            matches.push(RawMatch {
                text: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
                pattern: pattern.id,
            });
        }
    }

    matches.sort_by_key(|m| (m.start, m.pattern));
    matches
}
