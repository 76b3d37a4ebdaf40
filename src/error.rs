use thiserror::Error;

#[derive(Error, Debug)]
pub enum PushfitError {
    #[error("Not enough elements for fitness case #{index} \"{text}\"")]
    MalformedCase { index: usize, text: String },

    #[error("Fitness case #{index}: {field} \"{literal}\" is not a valid literal")]
    LiteralFormat {
        index: usize,
        field: String,
        literal: String,
    },

    #[error("Predictor has no sample indices or evaluation context bound")]
    UnboundPredictor,

    #[error("Sample index {index} at position {position} is out of range for {len} test cases")]
    IndexOutOfRange {
        index: usize,
        position: usize,
        len: usize,
    },

    #[error("Expected at least {expected} sample indices, got {actual}")]
    SampleLength { expected: usize, actual: usize },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PushfitError>;
