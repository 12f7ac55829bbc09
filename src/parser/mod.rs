pub mod dedup;
pub mod filter;
pub mod markers;
pub mod separate;
pub mod split;

use indicatif::ProgressBar;
use tracing::{debug, info};

use crate::error::Result;
use crate::model::{CleanStats, CleanedDocument, Profile, RawDocument};
use crate::settings::CleanerConfig;
use filter::SkipCounts;
use markers::{AuthorBylineDetector, MarkerDetector};

pub struct CleanOutcome {
    pub document: CleanedDocument,
    pub skips: SkipCounts,
}

/// Four-stage pipeline: split → separate → filter → deduplicate.
pub struct Cleaner<D = AuthorBylineDetector> {
    config: CleanerConfig,
    detector: D,
}

impl Cleaner<AuthorBylineDetector> {
    pub fn new(config: CleanerConfig) -> Result<Self> {
        let detector = AuthorBylineDetector::new(&config.author_pattern)?;
        Ok(Cleaner::with_detector(config, detector))
    }
}

impl<D: MarkerDetector> Cleaner<D> {
    pub fn with_detector(config: CleanerConfig, detector: D) -> Self {
        Cleaner { config, detector }
    }

    /// Clean a whole raw document. `run_at` stamps entries the extractor left
    /// undated. Fails before doing any work if a block's markers are invalid.
    pub fn clean(&self, doc: &RawDocument, run_at: &str, pb: &ProgressBar) -> Result<CleanOutcome> {
        let given: Vec<_> = doc
            .blocks
            .iter()
            .enumerate()
            .map(|(i, b)| b.byte_markers(i))
            .collect::<Result<_>>()?;

        let mut parsed = Vec::new();
        let mut skips = SkipCounts::default();
        let mut blocks_split = 0;

        for (i, (block, markers)) in doc.blocks.iter().zip(given).enumerate() {
            let markers = markers.unwrap_or_else(|| self.detector.detect(&block.text));
            let candidates = split::split_block(&block.text, &markers);
            if candidates.len() > 1 {
                blocks_split += 1;
                debug!(block = i, parts = candidates.len(), "split block");
            }

            let extracted_at = block.extracted_at.as_deref().unwrap_or(run_at);
            for candidate in &candidates {
                let entry = separate::separate(candidate, &self.detector, extracted_at);
                match filter::check(&entry, &self.config) {
                    Ok(()) => parsed.push(entry),
                    Err(reason) => {
                        debug!(block = i, %reason, "skipped entry");
                        skips.record(reason);
                    }
                }
            }
            pb.inc(1);
        }

        let after_cleaning = parsed.len();
        let answers = dedup::deduplicate(parsed);
        info!(
            "Cleaned {} blocks ({} split): {} kept, {} skipped, {} unique",
            doc.blocks.len(),
            blocks_split,
            after_cleaning,
            skips.total(),
            answers.len()
        );

        let raw = &doc.scraping_stats;
        let scraping_stats = CleanStats {
            scrolls_performed: raw.scrolls_performed,
            expansions_attempted: raw.expansions_attempted,
            answers_extracted: raw.answers_extracted.unwrap_or(doc.blocks.len() as u64),
            original_extractions: doc.blocks.len(),
            blocks_split,
            entries_skipped: skips.total(),
            after_cleaning,
            after_deduplication: answers.len(),
        };

        let profile = Profile {
            scraped_at: Some(doc.profile.scraped_at.clone().unwrap_or_else(|| run_at.to_string())),
            ..doc.profile.clone()
        };

        Ok(CleanOutcome {
            document: CleanedDocument {
                profile,
                scraping_stats,
                answers,
            },
            skips,
        })
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use std::ops::Range;

    use super::*;
    use crate::error::CleanError;
    use crate::model::{MarkerSpan, RawBlock, RawStats};

    const RUN_AT: &str = "2024-06-01T00:00:00+00:00";

    const BLOCK_1: &str = "What is the best way to learn programming? \
        Build small projects every day and read other people's code.";
    const BLOCK_2: &str = "Ann Lee, Engineer·2y·What is the best way to learn programming? \
        Practice daily, read widely, and build real things you care about over many months. \
        Bob Ray, Teacher·3y·Why do compilers exist at all? They translate readable source into machine code.";
    const BLOCK_3: &str = "How do I stay motivated while studying? Set small goals and celebrate each one you reach.";

    /// Character span of `needle` inside `text`.
    fn char_span(text: &str, needle: &str) -> MarkerSpan {
        let byte = text.find(needle).unwrap();
        let start = text[..byte].chars().count();
        MarkerSpan::Span {
            start,
            end: start + needle.chars().count(),
        }
    }

    fn block(text: &str, markers: Option<Vec<MarkerSpan>>) -> RawBlock {
        RawBlock {
            text: text.to_string(),
            markers,
            answer: None,
            extracted_at: None,
        }
    }

    fn document(blocks: Vec<RawBlock>) -> RawDocument {
        RawDocument {
            profile: Profile {
                user_id: "Ann-Lee-7".to_string(),
                url: "https://www.quora.com/profile/Ann-Lee-7".to_string(),
                scraped_at: None,
                nb_answers_claimed: None,
            },
            scraping_stats: RawStats::default(),
            blocks,
        }
    }

    fn clean(doc: &RawDocument) -> CleanOutcome {
        Cleaner::new(CleanerConfig::default())
            .unwrap()
            .clean(doc, RUN_AT, &ProgressBar::hidden())
            .unwrap()
    }

    fn three_blocks(markers: Option<Vec<MarkerSpan>>) -> RawDocument {
        document(vec![
            block(BLOCK_1, Some(vec![])),
            block(BLOCK_2, markers),
            block(BLOCK_3, None),
        ])
    }

    #[test]
    fn end_to_end_with_given_markers() {
        let markers = vec![
            char_span(BLOCK_2, "Ann Lee, Engineer·2y·"),
            char_span(BLOCK_2, "Bob Ray, Teacher·3y·"),
        ];
        let out = clean(&three_blocks(Some(markers)));
        let doc = &out.document;

        assert_eq!(doc.answers.len(), 3);
        assert_eq!(doc.scraping_stats.after_deduplication, 3);
        assert_eq!(doc.scraping_stats.after_cleaning, 4);
        assert_eq!(doc.scraping_stats.blocks_split, 1);
        assert_eq!(doc.scraping_stats.original_extractions, 3);
        assert_eq!(doc.scraping_stats.entries_skipped, 0);

        let questions: Vec<&str> = doc.answers.iter().map(|a| a.question.as_str()).collect();
        assert_eq!(
            questions,
            vec![
                "What is the best way to learn programming?",
                "Why do compilers exist at all?",
                "How do I stay motivated while studying?",
            ]
        );
        // block 2's answer is longer, so it replaces block 1's in the first slot
        assert!(doc.answers[0].answer.starts_with("Practice daily"));
        assert_eq!(doc.answers[1].answer, "They translate readable source into machine code.");
    }

    #[test]
    fn end_to_end_with_detected_markers() {
        let out = clean(&three_blocks(None));
        assert_eq!(out.document.answers.len(), 3);
        assert_eq!(out.document.scraping_stats.blocks_split, 1);
    }

    #[test]
    fn trailing_byline_keeps_its_entry() {
        let text = "What is the best editor for Rust code? Any editor with rust-analyzer works well. Jim Beam Editor·1y·";
        let out = clean(&document(vec![block(text, None)]));
        assert_eq!(out.skips.total(), 0);
        assert_eq!(out.document.answers.len(), 1);
        assert_eq!(out.document.answers[0].question, "What is the best editor for Rust code?");
        assert_eq!(out.document.answers[0].answer, "Any editor with rust-analyzer works well.");
    }

    #[test]
    fn single_mid_block_marker() {
        let text = "Which shell do you use every day? Fish, because the autosuggestions save me a lot of typing. \
                    Jim Beam Editor·1y·It has good defaults.";
        let markers = vec![char_span(text, "Jim Beam Editor·1y·")];
        let out = clean(&document(vec![block(text, Some(markers))]));
        assert_eq!(out.document.scraping_stats.blocks_split, 0);
        assert_eq!(out.document.answers.len(), 1);
        let a = &out.document.answers[0];
        assert_eq!(a.question, "Which shell do you use every day?");
        assert!(a.answer.ends_with("It has good defaults."));
        assert!(!a.answer.contains("Jim Beam"));
    }

    #[test]
    fn stats_and_profile_fallbacks() {
        let mut doc = three_blocks(None);
        let out = clean(&doc);
        assert_eq!(out.document.scraping_stats.answers_extracted, 3);
        assert_eq!(out.document.profile.scraped_at.as_deref(), Some(RUN_AT));
        assert_eq!(out.document.answers[2].extracted_at, RUN_AT);

        doc.scraping_stats = RawStats {
            scrolls_performed: 12,
            expansions_attempted: 40,
            answers_extracted: Some(57),
        };
        doc.profile.scraped_at = Some("2024-05-30T08:00:00".to_string());
        doc.blocks[2].extracted_at = Some("2024-05-30T08:01:00".to_string());
        let out = clean(&doc);
        assert_eq!(out.document.scraping_stats.answers_extracted, 57);
        assert_eq!(out.document.scraping_stats.scrolls_performed, 12);
        assert_eq!(out.document.profile.scraped_at.as_deref(), Some("2024-05-30T08:00:00"));
        assert_eq!(out.document.answers[2].extracted_at, "2024-05-30T08:01:00");
    }

    #[test]
    fn invalid_entries_are_counted() {
        let doc = document(vec![
            block("No question mark anywhere in this block of text.", None),
            block("Too short? But the answer is long enough.", None),
            block("Is this question long enough to pass? Nope", None),
            block(BLOCK_3, None),
        ]);
        let out = clean(&doc);
        assert_eq!(out.document.answers.len(), 1);
        assert_eq!(out.skips.empty_question, 1);
        assert_eq!(out.skips.question_too_short, 1);
        assert_eq!(out.skips.answer_too_short, 1);
        assert_eq!(out.document.scraping_stats.entries_skipped, 3);
    }

    #[test]
    fn bad_marker_aborts_run() {
        let doc = document(vec![block(BLOCK_1, None), block(BLOCK_3, Some(vec![MarkerSpan::At(10_000)]))]);
        let result = Cleaner::new(CleanerConfig::default())
            .unwrap()
            .clean(&doc, RUN_AT, &ProgressBar::hidden());
        assert!(matches!(result, Err(CleanError::MarkerOutOfRange { block: 1, .. })));
    }

    #[test]
    fn bad_pattern_rejected() {
        let config = CleanerConfig {
            author_pattern: "(".to_string(),
            ..CleanerConfig::default()
        };
        assert!(matches!(Cleaner::new(config), Err(CleanError::InvalidPattern(_))));
    }

    struct PipeDetector;

    impl MarkerDetector for PipeDetector {
        fn detect(&self, text: &str) -> Vec<Range<usize>> {
            text.match_indices("||").map(|(i, m)| i..i + m.len()).collect()
        }
    }

    #[test]
    fn detector_is_replaceable() {
        let text = "||Which language should I learn first? Python is a gentle start for most.\
                    ||Is Rust hard to learn at the start? The borrow checker takes a few weeks.";
        let doc = document(vec![block(text, None)]);
        let out = Cleaner::with_detector(CleanerConfig::default(), PipeDetector)
            .clean(&doc, RUN_AT, &ProgressBar::hidden())
            .unwrap();
        let questions: Vec<&str> = out.document.answers.iter().map(|a| a.question.as_str()).collect();
        assert_eq!(
            questions,
            vec!["Which language should I learn first?", "Is Rust hard to learn at the start?"]
        );
    }
}
