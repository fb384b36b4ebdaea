//! The per-topic workflow: resolve, fetch, extract, summarize.

use timeline_types::TopicReport;

use crate::error::Result;
use crate::pipeline::Extractor;
use crate::sources::{PageResolver, Summarizer, TextSource};

/// Build the report for one topic.
///
/// Resolution and fetch failures are returned as errors. A failing
/// summarizer only costs the summaries: it is logged and the report is
/// returned without them.
pub fn build_report(
    topic: &str,
    resolver: &dyn PageResolver,
    source: &dyn TextSource,
    summarizer: Option<&dyn Summarizer>,
    extractor: &Extractor,
) -> Result<TopicReport> {
    let page = resolver.resolve(topic)?;
    tracing::info!(topic, page = %page, "resolved topic");

    let text = source.fetch(&page)?;
    let extraction = extractor.extract(&text);
    tracing::info!(
        topic,
        text_length = extraction.text_length,
        dates_found = extraction.dates_found,
        "extracted dates"
    );

    let summaries = match summarizer {
        Some(s) => s.summarize(topic, &extraction.dates).unwrap_or_else(|e| {
            tracing::warn!(topic, error = %e, "summarizer failed, continuing without summaries");
            Vec::new()
        }),
        None => Vec::new(),
    };

    Ok(TopicReport {
        topic: topic.to_string(),
        page: Some(page),
        text_length: extraction.text_length,
        raw_matches: extraction.raw_matches,
        dates_found: extraction.dates_found,
        dates: extraction.dates.to_date_entries(),
        summaries,
        error: None,
    })
}

/// Build reports for several topics. A failed topic gets a report carrying
/// the error message; the rest of the batch still runs.
pub fn build_reports(
    topics: &[String],
    resolver: &dyn PageResolver,
    source: &dyn TextSource,
    summarizer: Option<&dyn Summarizer>,
    extractor: &Extractor,
) -> Vec<TopicReport> {
    topics
        .iter()
        .map(|topic| {
            build_report(topic, resolver, source, summarizer, extractor).unwrap_or_else(|e| {
                tracing::error!(topic = %topic, error = %e, "topic failed");
                TopicReport::failed(topic, e.to_string())
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use timeline_types::SummaryRecord;

    use super::*;
    use crate::sources::SourceError;
    use crate::summary::ExcerptSummarizer;
    use crate::types::DateContextMap;

    struct Pages(HashMap<&'static str, &'static str>);

    impl PageResolver for Pages {
        fn resolve(&self, topic: &str) -> std::result::Result<String, SourceError> {
            let page = topic.replace(' ', "_");
            if self.0.contains_key(page.as_str()) {
                Ok(page)
            } else {
                Err(SourceError::NotFound(topic.to_string()))
            }
        }
    }

    impl TextSource for Pages {
        fn fetch(&self, page: &str) -> std::result::Result<String, SourceError> {
            self.0
                .get(page)
                .map(|s| s.to_string())
                .ok_or_else(|| SourceError::Fetch(page.to_string()))
        }
    }

    struct Broken;

    impl Summarizer for Broken {
        fn summarize(
            &self,
            _topic: &str,
            _dates: &DateContextMap,
        ) -> std::result::Result<Vec<SummaryRecord>, SourceError> {
            Err(SourceError::Summarize("quota exceeded".into()))
        }
    }

    fn pages() -> Pages {
        Pages(HashMap::from([
            (
                "Moon_landing",
                "Apollo 11 landed on July 20, 1969. The first lander had crashed there in 1959.",
            ),
            ("Empty_page", ""),
        ]))
    }

    #[test]
    fn test_report_fields() {
        let p = pages();
        let summarizer = ExcerptSummarizer::default();
        let r = build_report(
            "Moon landing",
            &p,
            &p,
            Some(&summarizer),
            &Extractor::default(),
        )
        .unwrap();
        assert_eq!(r.page.as_deref(), Some("Moon_landing"));
        assert_eq!(r.dates_found, 2);
        let dates: Vec<&str> = r.dates.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["1959", "1969-07-20"]);
        assert_eq!(r.summaries.len(), 2);
        assert!(!r.is_failed());
    }

    #[test]
    fn test_summarizer_failure_is_not_fatal() {
        let p = pages();
        let r = build_report("Moon landing", &p, &p, Some(&Broken), &Extractor::default()).unwrap();
        assert_eq!(r.dates_found, 2);
        assert!(r.summaries.is_empty());
    }

    #[test]
    fn test_unknown_topic_is_error() {
        let p = pages();
        let err = build_report("Atlantis", &p, &p, None, &Extractor::default()).unwrap_err();
        assert_eq!(err.to_string(), "page not found: Atlantis");
    }

    #[test]
    fn test_batch_records_failures() {
        let p = pages();
        let topics = vec![
            "Moon landing".to_string(),
            "Atlantis".to_string(),
            "Empty page".to_string(),
        ];
        let reports = build_reports(&topics, &p, &p, None, &Extractor::default());
        assert_eq!(reports.len(), 3);
        assert!(!reports[0].is_failed());
        assert_eq!(reports[1].error.as_deref(), Some("page not found: Atlantis"));
        assert!(!reports[2].is_failed());
        assert_eq!(reports[2].dates_found, 0);
    }
}
