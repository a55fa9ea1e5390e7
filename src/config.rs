//! Serializable compressor configurations

use serde::{Deserialize, Deserializer, Serialize};

use crate::compressor::{Compressor, CompressorProvider};
use crate::deflate::{check_level, ZlibCompressor};
use crate::zstd_dict::{DictionarySize, ZstdCompressor, DEFAULT_LEVEL};

/// Available compression algorithms
///
/// Every variant describes how to build one unfitted compressor, so a value of
/// this enum can be handed straight to
/// [`CompressorClassifier::new`](crate::CompressorClassifier::new).
///
/// # Examples
///
/// ```
/// use fftc::{CompressionAlgorithm, DictionarySize};
///
/// let algorithm: CompressionAlgorithm =
///     serde_json::from_str(r#"{"algorithm": "zstd", "level": 12, "size": 0}"#).unwrap();
/// assert_eq!(
///     algorithm,
///     CompressionAlgorithm::Zstd { level: 12, size: DictionarySize::Unbounded }
/// );
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    /// Facebook's zstd library, provided by zstd
    Zstd {
        /// Compression level
        level: i32,
        /// Dictionary size policy
        #[serde(default)]
        size: DictionarySize,
    },
    /// The zlib format, provided by flate2
    Zlib {
        /// Compression level, 0 to 9
        #[serde(deserialize_with = "deflate_level")]
        level: u32,
    },
    /// The classic deflate algorithm, provided by flate2
    Deflate {
        /// Compression level, 0 to 9
        #[serde(deserialize_with = "deflate_level")]
        level: u32,
    },
}

/// Deserialize a deflate level, rejecting values flate2 cannot initialize with
fn deflate_level<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let level = u32::deserialize(deserializer)?;
    check_level(level).map_err(serde::de::Error::custom)
}

impl Default for CompressionAlgorithm {
    fn default() -> Self {
        CompressionAlgorithm::zstd(DEFAULT_LEVEL)
    }
}

impl CompressionAlgorithm {
    /// zstd at `level` with the whole corpus as dictionary
    pub fn zstd(level: i32) -> CompressionAlgorithm {
        CompressionAlgorithm::Zstd {
            level,
            size: DictionarySize::Corpus,
        }
    }

    /// Build a fresh, unfitted compressor
    pub fn new_compressor(&self) -> Box<dyn Compressor> {
        match *self {
            CompressionAlgorithm::Zstd { level, size } => {
                Box::new(ZstdCompressor::with_size(level, size))
            }
            CompressionAlgorithm::Zlib { level } => Box::new(ZlibCompressor::zlib(level)),
            CompressionAlgorithm::Deflate { level } => Box::new(ZlibCompressor::deflate(level)),
        }
    }
}

impl CompressorProvider for CompressionAlgorithm {
    fn provide(&mut self) -> Box<dyn Compressor> {
        self.new_compressor()
    }
}
