//! Summarizer plumbing: the prompt sent to a language model, the parser for
//! what comes back, and an offline stand-in.

use serde::Serialize;
use serde_json::Value;
use timeline_types::SummaryRecord;

use crate::sources::{SourceError, Summarizer};
use crate::types::DateContextMap;

/// Dates passed to a summarizer by default.
pub const DEFAULT_PROMPT_LIMIT: usize = 30;

const SYSTEM_PROMPT: &str = "\
You are a precise historical event analyzer. \
Given dated passages from an encyclopedia article, build a complete timeline.
Rules:
1. Process every date listed; do not skip any.
2. Keep each date exactly as written.
3. Merge related events that share a date.
4. Keep all historical context and detail.
5. Write clear, informative summaries.
6. Never add information that is not in the source text.
7. Return only a JSON array shaped like:
[
  {\"date\": \"YYYY-MM-DD\", \"summary\": \"Event summary with context\"},
  {\"date\": \"YYYY\", \"summary\": \"Another event\"}
]
8. Keep chronological order.
9. Include BCE/CE dates, ranges and approximate (c.) dates.
Return only the JSON array, with no other text.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryPrompt {
    pub system: String,
    pub user: String,
}

/// Prompt for the first `limit` dates of `dates`.
pub fn build_summary_prompt(topic: &str, dates: &DateContextMap, limit: usize) -> SummaryPrompt {
    let events: Vec<String> = dates
        .iter()
        .take(limit)
        .map(|(date, span)| format!("- {date}: {}", span.text))
        .collect();

    SummaryPrompt {
        system: SYSTEM_PROMPT.to_string(),
        user: format!("Topic: {topic}\n\nExtracted events:\n{}", events.join("\n")),
    }
}

/// Pull `{date, summary}` records out of a model reply.
///
/// The reply may wrap the array in prose or code fences. Anything that
/// cannot be read as an array yields an empty list; elements missing either
/// field are skipped.
pub fn parse_summary_response(response: &str) -> Vec<SummaryRecord> {
    let content = response.trim();
    if content.is_empty() {
        tracing::warn!("empty summarizer response");
        return Vec::new();
    }

    let (Some(start), Some(end)) = (content.find('['), content.rfind(']')) else {
        tracing::warn!(response = %preview(content), "no JSON array in summarizer response");
        return Vec::new();
    };
    if end < start {
        return Vec::new();
    }

    let events = match serde_json::from_str::<Value>(&content[start..=end]) {
        Ok(Value::Array(events)) => events,
        Ok(_) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, response = %preview(content), "bad summarizer JSON");
            return Vec::new();
        }
    };

    events
        .iter()
        .filter_map(|event| {
            let date = field_text(event.get("date")?);
            let summary = field_text(event.get("summary")?);
            Some(SummaryRecord { date, summary })
        })
        .collect()
}

fn field_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

fn preview(s: &str) -> String {
    s.chars().take(100).collect()
}

// ── Offline summarizer ───────────────────────────────────────────────

/// Uses the extracted context itself, cut to `max_chars`, as the summary.
#[derive(Debug, Clone, Copy)]
pub struct ExcerptSummarizer {
    pub max_chars: usize,
}

impl Default for ExcerptSummarizer {
    fn default() -> Self {
        ExcerptSummarizer { max_chars: 160 }
    }
}

impl Summarizer for ExcerptSummarizer {
    fn summarize(
        &self,
        _topic: &str,
        dates: &DateContextMap,
    ) -> Result<Vec<SummaryRecord>, SourceError> {
        Ok(dates
            .to_date_entries()
            .into_iter()
            .map(|entry| SummaryRecord {
                summary: entry.excerpt(self.max_chars),
                date: entry.date,
            })
            .collect())
    }
}
