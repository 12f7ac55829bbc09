use std::collections::HashMap;

use crate::model::{CleanedRecord, ParsedEntry};

/// Lowercase, drop punctuation, collapse whitespace.
pub fn normalize_question(question: &str) -> String {
    let stripped: String = question
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse entries whose normalized questions match exactly.
///
/// The longer answer wins; on a tie the earlier entry stays. Survivors keep
/// the slot of the first occurrence of their question.
pub fn deduplicate<I>(entries: I) -> Vec<CleanedRecord>
where
    I: IntoIterator<Item = ParsedEntry>,
{
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<ParsedEntry> = Vec::new();

    for entry in entries {
        let key = normalize_question(&entry.question);
        match slots.get(&key) {
            Some(&idx) => {
                if entry.answer.chars().count() > kept[idx].answer.chars().count() {
                    kept[idx] = entry;
                }
            }
            None => {
                slots.insert(key, kept.len());
                kept.push(entry);
            }
        }
    }

    kept.into_iter().map(CleanedRecord::from).collect()
}
