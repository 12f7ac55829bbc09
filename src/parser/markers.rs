use std::ops::Range;

use regex::Regex;

use crate::error::Result;

/// Finds author-marker spans (bylines) in raw block text.
///
/// Implementations are site-specific; splitting and separation only rely on
/// the returned byte ranges being ordered by start.
pub trait MarkerDetector {
    fn detect(&self, text: &str) -> Vec<Range<usize>>;

    /// Remove every detected marker from `text`.
    fn strip(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for m in self.detect(text) {
            if m.start < last {
                continue;
            }
            out.push_str(&text[last..m.start]);
            last = m.end;
        }
        out.push_str(&text[last..]);
        out
    }
}

/// Regex-based byline detector. Case-sensitive unless the pattern says `(?i)`.
#[derive(Debug, Clone)]
pub struct AuthorBylineDetector {
    re: Regex,
}

impl AuthorBylineDetector {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(AuthorBylineDetector {
            re: Regex::new(pattern)?,
        })
    }
}

impl MarkerDetector for AuthorBylineDetector {
    fn detect(&self, text: &str) -> Vec<Range<usize>> {
        self.re.find_iter(text).map(|m| m.range()).collect()
    }
}
