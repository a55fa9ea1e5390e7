#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
//! Text classification with per-class dictionary compressors
//!
//! Data compresses best against a dictionary drawn from similar content. This
//! crate fits one (or a few) dictionary compressors per label from the labeled
//! training texts, then labels a new text with the label whose compressors
//! compress it into the fewest bytes.
//!
//! Compressors are pluggable through the [`Compressor`] trait. The crate ships
//! a zstd compressor with a size-bounded dictionary ([`ZstdCompressor`]) and
//! deflate compressors primed with a preset dictionary ([`ZlibCompressor`]).
//!
//! # Examples
//!
//! ```
//! use fftc::{CompressionAlgorithm, CompressorClassifier};
//!
//! let training = vec![
//!     ("normal".to_string(), "some normal sentence"),
//!     ("normal".to_string(), "another quite normal sentence"),
//!     ("godzilla".to_string(), "godzilla ate mars in June"),
//!     ("godzilla".to_string(), "godzilla ate venus in July"),
//! ];
//! // zstd at compression level 3, whole training corpus as dictionary:
//! let mut classifier = CompressorClassifier::new(CompressionAlgorithm::zstd(3));
//! classifier.fit(training)?;
//! println!("{:?}", classifier.predict("godzilla eats marshes in August")?);
//! println!("{:?}", classifier.dictionaries_size()?);
//! # Ok::<(), fftc::Error>(())
//! ```
mod classifier;
mod compressor;
mod config;
mod deflate;
mod error;
mod zstd_dict;

pub use classifier::CompressorClassifier;
pub use compressor::{Compressor, CompressorProvider};
pub use config::CompressionAlgorithm;
pub use deflate::{ZlibCompressor, MAX_LEVEL, WINDOW_SIZE};
pub use error::{Error, Result};
pub use zstd_dict::{DictionarySize, ZstdCompressor, DEFAULT_LEVEL};
