use serde::{Deserialize, Serialize};

// ── Dated entry ──────────────────────────────────────────────────────────

/// A canonical date paired with the text that explains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateEntry {
    /// Canonical date string, e.g. "2023-01-15", "1990s", "c. 450 BCE"
    pub date: String,
    pub context: String,
}

impl DateEntry {
    /// Context cut down to at most `max_chars` characters, with a trailing
    /// ellipsis when something was dropped.
    pub fn excerpt(&self, max_chars: usize) -> String {
        if self.context.chars().count() <= max_chars {
            return self.context.clone();
        }
        let cut: String = self.context.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

// ── Summaries ────────────────────────────────────────────────────────────

/// One summarized timeline event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub date: String,
    pub summary: String,
}

// ── Per-topic report ─────────────────────────────────────────────────────

/// Everything produced for a single topic: resolved page, extracted dates
/// in chronological order and (optionally) their summaries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicReport {
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    pub text_length: usize,
    pub raw_matches: usize,
    pub dates_found: usize,
    #[serde(default)]
    pub dates: Vec<DateEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub summaries: Vec<SummaryRecord>,
    /// Set when the topic could not be resolved or fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TopicReport {
    /// A report for a topic that failed before extraction could run.
    pub fn failed(topic: &str, error: impl Into<String>) -> Self {
        TopicReport {
            topic: topic.to_string(),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}
