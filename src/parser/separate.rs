use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::markers::MarkerDetector;
use crate::model::{CandidateEntry, ParsedEntry};

// Page chrome the extractor sometimes captures ahead of the first entry.
static NAV_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)^Skip to content.*?Most recent").unwrap());
static FOLLOWERS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+ followers.*?More").unwrap());

/// Separate a candidate span into question and answer.
///
/// The body starts after the candidate's marker when that marker leads the
/// content. A marker with a `?` before it and none after is a trailing byline,
/// so the whole span is the body and the byline is stripped from the answer.
///
/// The question runs up to and including the LAST `?`, so a question asked
/// in several sentences stays whole. An answer containing `?` is pulled into
/// the question up to its last one. No `?` yields an empty question.
pub fn separate(
    candidate: &CandidateEntry<'_>,
    detector: &dyn MarkerDetector,
    extracted_at: &str,
) -> ParsedEntry {
    let body = match &candidate.marker {
        Some(m) if leads(candidate.text, m) => &candidate.text[m.end..],
        _ => candidate.text,
    };
    let body = strip_preamble(body.trim_start());

    let (question, answer) = match body.rfind('?') {
        Some(pos) => {
            let head = &body[..=pos];
            // content follows the last byline
            let head = match detector.detect(head).last() {
                Some(m) => &head[m.end..],
                None => head,
            };
            (head.trim().to_string(), detector.strip(&body[pos + 1..]).trim().to_string())
        }
        None => (String::new(), body.trim().to_string()),
    };

    ParsedEntry {
        question,
        answer,
        extracted_at: extracted_at.to_string(),
    }
}

fn leads(text: &str, marker: &Range<usize>) -> bool {
    text[marker.end..].contains('?') || !text[..marker.start].contains('?')
}

fn strip_preamble(body: &str) -> String {
    let body = NAV_RE.replace(body, "");
    FOLLOWERS_RE.replace(body.trim_start(), "").into_owned()
}
