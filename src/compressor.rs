//! The compressor capability the classifier is built on
//!
//! A [`Compressor`] owns a dictionary fitted from training text, and reports how
//! many bytes an arbitrary text takes once compressed against that dictionary.
//! Smaller lengths mean the text looks more like the dictionary's source corpus,
//! which is the only signal [`CompressorClassifier`](crate::CompressorClassifier)
//! consumes.

use crate::error::Result;

/// A byte-stream compressor that can be fitted with a dictionary
///
/// Implementations must fail every scoring call with
/// [`Error::NotFitted`](crate::Error::NotFitted) until [`Compressor::fit`] has
/// succeeded once.
///
/// # Examples
///
/// ```
/// use fftc::{Compressor, ZstdCompressor};
///
/// let mut compressor = ZstdCompressor::default();
/// compressor.fit(&["godzilla ate mars in June", "godzilla ate venus in July"])?;
/// println!("{:?}", compressor.compressed_length("godzilla ate earth in May")?);
/// println!("{:?}", compressor.dictionary_size()?);
/// # Ok::<(), fftc::Error>(())
/// ```
pub trait Compressor: Send + Sync {
    /// Build a dictionary from `texts`, replacing any dictionary fitted before
    fn fit(&mut self, texts: &[&str]) -> Result<()>;

    /// Length in bytes of `text` once compressed against the fitted dictionary
    fn compressed_length(&self, text: &str) -> Result<usize>;

    /// Size in bytes of the fitted dictionary
    fn dictionary_size(&self) -> Result<usize>;
}

/// Factory handing out fresh, unfitted compressors
///
/// Any `FnMut() -> Box<dyn Compressor>` closure is a provider, so stateful or
/// heterogeneous configurations can be plugged in without touching the
/// classifier.
///
/// # Examples
///
/// ```
/// use fftc::{Compressor, CompressorClassifier, ZstdCompressor};
///
/// let classifier: CompressorClassifier<String> = CompressorClassifier::new(|| {
///     Box::new(ZstdCompressor::new(3)) as Box<dyn Compressor>
/// });
/// assert!(!classifier.is_fitted());
/// ```
pub trait CompressorProvider: Send + Sync {
    /// Produce a new compressor that has not been fitted yet
    fn provide(&mut self) -> Box<dyn Compressor>;
}

impl<F> CompressorProvider for F
where
    F: FnMut() -> Box<dyn Compressor> + Send + Sync,
{
    fn provide(&mut self) -> Box<dyn Compressor> {
        self()
    }
}

/// Join texts into one newline-separated corpus, in order
pub(crate) fn join_corpus(texts: &[&str]) -> String {
    texts.join("\n")
}
