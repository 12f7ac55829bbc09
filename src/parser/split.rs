use std::ops::Range;

use crate::model::CandidateEntry;

/// Split a block at its author markers.
///
/// Zero or one marker yields the whole block. N >= 2 markers yield N spans,
/// each running from its marker up to the next one; text before the first
/// marker stays with the first span so the spans concatenate back to `text`.
pub fn split_block<'a>(text: &'a str, markers: &[Range<usize>]) -> Vec<CandidateEntry<'a>> {
    let mut markers = markers.to_vec();
    markers.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    markers.dedup_by_key(|m| m.start);

    if markers.len() <= 1 {
        return vec![CandidateEntry {
            text,
            marker: markers.pop(),
        }];
    }

    let mut entries = Vec::with_capacity(markers.len());
    for (i, m) in markers.iter().enumerate() {
        let start = if i == 0 { 0 } else { m.start };
        let end = markers.get(i + 1).map_or(text.len(), |next| next.start);
        let marker_end = m.end.min(end);
        entries.push(CandidateEntry {
            text: &text[start..end],
            marker: Some(m.start - start..marker_end - start),
        });
    }
    entries
}
