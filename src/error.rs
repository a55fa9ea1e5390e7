//! Error types for fitting and scoring

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by compressors and classifiers
#[derive(Error, Debug)]
pub enum Error {
    /// A constructor or builder argument is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// `fit` was called without any training pairs
    #[error("Cannot fit a classifier on an empty training set")]
    EmptyTrainingSet,

    /// Evaluation was requested without any test pairs
    #[error("Cannot evaluate a classifier on an empty test set")]
    EmptyTestSet,

    /// The corpus handed to a compressor is too small to build a dictionary
    #[error("Insufficient data to build a dictionary: {0}")]
    InsufficientData(String),

    /// Scoring was attempted before training
    #[error("Compressor or classifier used before fit")]
    NotFitted,

    /// The underlying codec library reported a failure
    #[error("Codec {codec} failed: {message}")]
    Codec {
        /// Name of the codec
        codec: &'static str,
        /// Message reported by the codec
        message: String,
    },
}

impl Error {
    /// Wrap a codec failure
    pub(crate) fn codec(codec: &'static str, err: impl std::fmt::Display) -> Self {
        Error::Codec {
            codec,
            message: err.to_string(),
        }
    }
}
