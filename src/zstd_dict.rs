//! zstd compressor with a size-bounded dictionary
//!
//! The dictionary is either the raw training corpus, used verbatim as a
//! compression prefix, or a dictionary trained by zstd itself from the corpus
//! lines. Training on a corpus that is too small falls back to the raw corpus.

use std::io;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zstd::bulk;
use zstd::dict::{from_continuous, EncoderDictionary};

use crate::compressor::{join_corpus, Compressor};
use crate::error::{Error, Result};

/// Compression level used when none is given
pub const DEFAULT_LEVEL: i32 = 9;

/// How large a trained dictionary may grow
///
/// Serialized as a single integer: `-1`, `0` or a positive byte count.
///
/// # Examples
///
/// ```
/// use fftc::DictionarySize;
///
/// assert_eq!(DictionarySize::try_from(-1i64)?, DictionarySize::Corpus);
/// assert_eq!(DictionarySize::try_from(0i64)?, DictionarySize::Unbounded);
/// assert_eq!(DictionarySize::try_from(4096i64)?, DictionarySize::bounded(4096)?);
/// assert!(DictionarySize::try_from(-2i64).is_err());
/// assert!(DictionarySize::bounded(0).is_err());
/// # Ok::<(), fftc::Error>(())
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "i64", into = "i64")]
pub enum DictionarySize {
    /// `-1`: the whole newline-joined corpus is the dictionary
    #[default]
    Corpus,
    /// `0`: zstd trains a dictionary with no practical size bound
    Unbounded,
    /// `n > 0`: zstd trains a dictionary of at most `n` bytes
    Bounded(NonZeroUsize),
}

impl DictionarySize {
    /// Bound trained dictionaries to `max_size` bytes, which must be positive
    pub fn bounded(max_size: usize) -> Result<DictionarySize> {
        NonZeroUsize::new(max_size)
            .map(DictionarySize::Bounded)
            .ok_or_else(|| {
                Error::InvalidConfiguration("bounded dictionary size must be positive".into())
            })
    }
}

impl TryFrom<i64> for DictionarySize {
    type Error = Error;

    fn try_from(size: i64) -> Result<Self> {
        match size {
            -1 => Ok(DictionarySize::Corpus),
            0 => Ok(DictionarySize::Unbounded),
            n if n > 0 => usize::try_from(n)
                .map_err(|_| Error::InvalidConfiguration(format!("size {n} does not fit in memory")))
                .and_then(DictionarySize::bounded),
            n => Err(Error::InvalidConfiguration(format!(
                "size must be -1, 0 or a positive integer, got {n}"
            ))),
        }
    }
}

impl From<DictionarySize> for i64 {
    fn from(size: DictionarySize) -> i64 {
        match size {
            DictionarySize::Corpus => -1,
            DictionarySize::Unbounded => 0,
            DictionarySize::Bounded(n) => i64::try_from(n.get()).unwrap_or(i64::MAX),
        }
    }
}

/// A dictionary ready for compression
struct FittedDictionary {
    /// Dictionary bytes, either raw corpus or zstd-trained
    raw: Vec<u8>,
    /// The dictionary digested at the configured level
    prepared: EncoderDictionary<'static>,
}

/// zstd compressor fitted with a per-corpus dictionary
///
/// # Examples
///
/// ```
/// use fftc::{Compressor, DictionarySize, ZstdCompressor};
///
/// let mut compressor = ZstdCompressor::with_size(3, DictionarySize::bounded(1024)?);
/// // Too little data to train: the corpus itself becomes the dictionary.
/// compressor.fit(&["some normal sentence", "another normal sentence"])?;
/// assert_eq!(compressor.dictionary_size()?, 44);
/// # Ok::<(), fftc::Error>(())
/// ```
pub struct ZstdCompressor {
    /// Compression level
    level: i32,
    /// Dictionary size policy
    size: DictionarySize,
    /// Present once `fit` has succeeded
    dictionary: Option<FittedDictionary>,
}

impl Default for ZstdCompressor {
    fn default() -> Self {
        ZstdCompressor::new(DEFAULT_LEVEL)
    }
}

impl ZstdCompressor {
    /// Compressor at `level` using the whole corpus as dictionary
    pub fn new(level: i32) -> ZstdCompressor {
        ZstdCompressor::with_size(level, DictionarySize::Corpus)
    }

    /// Compressor at `level` with an explicit dictionary size policy
    pub fn with_size(level: i32, size: DictionarySize) -> ZstdCompressor {
        ZstdCompressor {
            level,
            size,
            dictionary: None,
        }
    }

    /// Compression level
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Dictionary size policy
    pub fn size(&self) -> DictionarySize {
        self.size
    }
}

/// Whether zstd refused to train because the samples are too small for the
/// requested dictionary
fn is_insufficient_data(err: &io::Error) -> bool {
    let message = err.to_string();
    message.contains("Src size is incorrect") || message.contains("Destination buffer is too small")
}

/// Train a zstd dictionary of at most `max_size` bytes from the corpus lines,
/// falling back to the raw corpus when there is not enough data to train one
fn train_or_corpus(texts: &[&str], corpus: String, max_size: usize) -> Result<Vec<u8>> {
    let mut samples = Vec::with_capacity(corpus.len());
    let mut sample_sizes = Vec::new();
    for line in texts.iter().flat_map(|text| text.split('\n')) {
        if !line.is_empty() {
            samples.extend_from_slice(line.as_bytes());
            sample_sizes.push(line.len());
        }
    }
    // zstd allocates the full capacity up front.
    let max_size = max_size.min(samples.len());

    match from_continuous(&samples, &sample_sizes, max_size) {
        Ok(trained) => {
            debug!(
                samples = sample_sizes.len(),
                sample_bytes = samples.len(),
                dictionary_bytes = trained.len(),
                "Trained zstd dictionary"
            );
            Ok(trained)
        }
        Err(err) if is_insufficient_data(&err) => {
            warn!(
                error = %err,
                samples = sample_sizes.len(),
                corpus_bytes = corpus.len(),
                "Could not train dictionary, not enough data. Using the whole corpus as dictionary."
            );
            Ok(corpus.into_bytes())
        }
        Err(err) => Err(Error::codec("zstd", err)),
    }
}

impl Compressor for ZstdCompressor {
    fn fit(&mut self, texts: &[&str]) -> Result<()> {
        let corpus = join_corpus(texts);
        if corpus.is_empty() {
            return Err(Error::InsufficientData(
                "zstd dictionary needs a non-empty corpus".into(),
            ));
        }
        let raw = match self.size {
            DictionarySize::Corpus => corpus.into_bytes(),
            DictionarySize::Unbounded => train_or_corpus(texts, corpus, usize::MAX)?,
            DictionarySize::Bounded(max_size) => train_or_corpus(texts, corpus, max_size.get())?,
        };
        let prepared = EncoderDictionary::copy(&raw, self.level);
        self.dictionary = Some(FittedDictionary { raw, prepared });
        Ok(())
    }

    fn compressed_length(&self, text: &str) -> Result<usize> {
        let dictionary = self.dictionary.as_ref().ok_or(Error::NotFitted)?;
        let mut compressor = bulk::Compressor::with_prepared_dictionary(&dictionary.prepared)
            .map_err(|e| Error::codec("zstd", e))?;
        let compressed = compressor
            .compress(text.as_bytes())
            .map_err(|e| Error::codec("zstd", e))?;
        Ok(compressed.len())
    }

    fn dictionary_size(&self) -> Result<usize> {
        self.dictionary
            .as_ref()
            .map(|dictionary| dictionary.raw.len())
            .ok_or(Error::NotFitted)
    }
}
