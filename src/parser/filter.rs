use std::fmt;

use crate::model::ParsedEntry;
use crate::settings::CleanerConfig;

/// Why an entry was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyQuestion,
    QuestionTooShort,
    AnswerTooShort,
    QuestionIsAnswer,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::EmptyQuestion => "empty question",
            SkipReason::QuestionTooShort => "question too short",
            SkipReason::AnswerTooShort => "answer too short",
            SkipReason::QuestionIsAnswer => "question equals answer",
        };
        f.write_str(s)
    }
}

/// Per-reason skip counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub empty_question: usize,
    pub question_too_short: usize,
    pub answer_too_short: usize,
    pub question_is_answer: usize,
}

impl SkipCounts {
    pub fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::EmptyQuestion => self.empty_question += 1,
            SkipReason::QuestionTooShort => self.question_too_short += 1,
            SkipReason::AnswerTooShort => self.answer_too_short += 1,
            SkipReason::QuestionIsAnswer => self.question_is_answer += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.empty_question + self.question_too_short + self.answer_too_short + self.question_is_answer
    }
}

/// Check an entry against the configured length thresholds. Lengths are in
/// characters and must strictly exceed the threshold.
pub fn check(entry: &ParsedEntry, config: &CleanerConfig) -> Result<(), SkipReason> {
    if entry.question.is_empty() {
        return Err(SkipReason::EmptyQuestion);
    }
    if entry.question.chars().count() <= config.min_question_chars {
        return Err(SkipReason::QuestionTooShort);
    }
    if entry.answer.chars().count() <= config.min_answer_chars {
        return Err(SkipReason::AnswerTooShort);
    }
    if entry.question == entry.answer {
        return Err(SkipReason::QuestionIsAnswer);
    }
    Ok(())
}
