use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{CleanError, Result};

// ── Extractor output ──

/// Raw document written by the extractor (`<user_id>_ultimate.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct RawDocument {
    pub profile: Profile,
    #[serde(default)]
    pub scraping_stats: RawStats,
    /// Older extractor runs wrote the blocks under `answers`.
    #[serde(alias = "answers")]
    pub blocks: Vec<RawBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nb_answers_claimed: Option<serde_json::Value>,
}

impl Profile {
    /// Claimed answer count as displayed on the profile, if the extractor saw one.
    pub fn claimed(&self) -> String {
        match &self.nb_answers_claimed {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(v) => v.to_string(),
            None => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawStats {
    pub scrolls_performed: u64,
    pub expansions_attempted: u64,
    pub answers_extracted: Option<u64>,
}

/// One scraped unit of text as it appeared on the page.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBlock {
    /// Older extractor runs stored the whole raw block in `question`.
    #[serde(alias = "question")]
    pub text: String,
    /// Author-marker positions in characters. `None` means "not detected yet".
    #[serde(default)]
    pub markers: Option<Vec<MarkerSpan>>,
    /// The extractor's own answer guess, kept only for the raw-stage text.
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub extracted_at: Option<String>,
}

/// A marker as the extractor reports it: a bare boundary offset or a full span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkerSpan {
    At(usize),
    Span { start: usize, end: usize },
}

impl MarkerSpan {
    pub fn start(&self) -> usize {
        match *self {
            MarkerSpan::At(at) => at,
            MarkerSpan::Span { start, .. } => start,
        }
    }

    pub fn end(&self) -> usize {
        match *self {
            MarkerSpan::At(at) => at,
            MarkerSpan::Span { end, .. } => end,
        }
    }
}

impl RawBlock {
    /// Convert the reported character spans into byte ranges over `text`.
    /// `index` is the block position, used only for the error message.
    pub fn byte_markers(&self, index: usize) -> Result<Option<Vec<Range<usize>>>> {
        let Some(markers) = &self.markers else {
            return Ok(None);
        };

        let offsets: Vec<usize> = self
            .text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(self.text.len()))
            .collect();
        let char_len = offsets.len() - 1;

        markers
            .iter()
            .map(|m| {
                let (start, end) = (m.start(), m.end());
                if start > end || end > char_len {
                    return Err(CleanError::MarkerOutOfRange {
                        block: index,
                        start,
                        end,
                        len: char_len,
                    });
                }
                Ok(offsets[start]..offsets[end])
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }
}

// ── Pipeline stages ──

/// A provisional span of a block at one marker boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEntry<'a> {
    pub text: &'a str,
    /// Leading marker, relative to `text`.
    pub marker: Option<Range<usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub question: String,
    pub answer: String,
    pub extracted_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub question: String,
    pub answer: String,
    pub extracted_at: String,
}

impl From<ParsedEntry> for CleanedRecord {
    fn from(e: ParsedEntry) -> Self {
        CleanedRecord {
            question: e.question,
            answer: e.answer,
            extracted_at: e.extracted_at,
        }
    }
}

// ── Cleaner output ──

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanStats {
    pub scrolls_performed: u64,
    pub expansions_attempted: u64,
    pub answers_extracted: u64,
    pub original_extractions: usize,
    pub blocks_split: usize,
    pub entries_skipped: usize,
    pub after_cleaning: usize,
    pub after_deduplication: usize,
}

/// Cleaned document written as `<user_id>_cleaned.json`.
#[derive(Debug, Clone, Serialize)]
pub struct CleanedDocument {
    pub profile: Profile,
    pub scraping_stats: CleanStats,
    pub answers: Vec<CleanedRecord>,
}
