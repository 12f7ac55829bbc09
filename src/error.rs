/// Errors that abort a whole cleaning run.
///
/// Per-entry problems (short questions, missing `?`) are not errors; they are
/// counted as skips by the validity filter.
#[derive(Debug, thiserror::Error)]
pub enum CleanError {
    /// The raw document is not valid JSON or lacks a required field.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A block carries a marker that does not fit inside its text.
    #[error("malformed input: block {block}: marker {start}..{end} outside text of {len} chars")]
    MarkerOutOfRange {
        block: usize,
        start: usize,
        end: usize,
        len: usize,
    },

    /// The configured author pattern does not compile.
    #[error("invalid author pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, CleanError>;
