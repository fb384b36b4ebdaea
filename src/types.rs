use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use timeline_types::DateEntry;

use crate::patterns::PatternId;

// ── Raw pattern hit ────────────────────────────────────────────────

/// One occurrence of one pattern in the source text.
///
/// `start`/`end` are byte offsets into the source and always fall on
/// `char` boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub pattern: PatternId,
}

// ── Context attached to a date ─────────────────────────────────────

/// Text explaining a date, plus the byte range it was cut from.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ContextSpan {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl ContextSpan {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

// ── Ordered date → context mapping ─────────────────────────────────

/// Canonical date string → best context, in a caller-controlled order.
///
/// Keys are unique. Inserting an existing key replaces its value in place,
/// so the entry keeps its position.
#[derive(Debug, Clone, Default)]
pub struct DateContextMap {
    entries: Vec<(String, ContextSpan)>,
    index: HashMap<String, usize>,
}

impl DateContextMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ContextSpan> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Insert or replace. Returns the previous value for `key`, if any.
    pub fn insert(&mut self, key: String, span: ContextSpan) -> Option<ContextSpan> {
        if let Some(&i) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[i].1, span));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, span));
        None
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextSpan)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Stable reorder by a key derived from each canonical date string.
    pub fn sort_by_key<K: Ord>(&mut self, mut f: impl FnMut(&str) -> K) {
        self.entries.sort_by_key(|(k, _)| f(k));
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (k, _))| (k.clone(), i))
            .collect();
    }

    pub fn to_date_entries(&self) -> Vec<DateEntry> {
        self.entries
            .iter()
            .map(|(date, span)| DateEntry {
                date: date.clone(),
                context: span.text.clone(),
            })
            .collect()
    }
}

impl PartialEq for DateContextMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for DateContextMap {}

/// Serializes as a JSON object whose key order is the map order.
impl Serialize for DateContextMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (date, span) in &self.entries {
            map.serialize_entry(date, &span.text)?;
        }
        map.end()
    }
}
