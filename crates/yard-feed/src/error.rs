use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// A malformed arrival record.  Loading stops at the first bad row.
    #[error("arrival feed line {line}: {msg}")]
    Parse { line: u64, msg: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FeedResult<T> = Result<T, FeedError>;
