//! Deflate-family compressors primed with a preset dictionary
//!
//! Deflate only looks back 32 KiB, so the dictionary is the tail of the corpus.

use flate2::{Compress, Compression, FlushCompress, Status};

use crate::compressor::{join_corpus, Compressor};
use crate::error::{Error, Result};

/// Largest useful preset dictionary for deflate
pub const WINDOW_SIZE: usize = 32 * 1024;

/// Highest compression level deflate accepts
pub const MAX_LEVEL: u32 = 9;

/// Reject levels deflate cannot be initialized with
pub(crate) fn check_level(level: u32) -> Result<u32> {
    if level > MAX_LEVEL {
        return Err(Error::InvalidConfiguration(format!(
            "deflate level must be between 0 and {MAX_LEVEL}, got {level}"
        )));
    }
    Ok(level)
}

/// Deflate compressor using the end of the training corpus as preset dictionary
///
/// # Examples
///
/// ```
/// use fftc::{Compressor, ZlibCompressor};
///
/// let mut compressor = ZlibCompressor::zlib(6);
/// compressor.fit(&["some normal sentence"])?;
/// println!("{:?}", compressor.compressed_length("another normal sentence")?);
/// # Ok::<(), fftc::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ZlibCompressor {
    /// Compression level, 0 to 9
    level: u32,
    /// Whether output carries the zlib header and trailer
    zlib_header: bool,
    /// Present once `fit` has succeeded
    dictionary: Option<Vec<u8>>,
}

impl ZlibCompressor {
    /// zlib-framed stream at `level`
    pub fn zlib(level: u32) -> ZlibCompressor {
        ZlibCompressor {
            level,
            zlib_header: true,
            dictionary: None,
        }
    }

    /// Raw deflate stream at `level`
    pub fn deflate(level: u32) -> ZlibCompressor {
        ZlibCompressor {
            level,
            zlib_header: false,
            dictionary: None,
        }
    }
}

impl Compressor for ZlibCompressor {
    fn fit(&mut self, texts: &[&str]) -> Result<()> {
        check_level(self.level)?;
        let corpus = join_corpus(texts).into_bytes();
        if corpus.is_empty() {
            return Err(Error::InsufficientData(
                "deflate dictionary needs a non-empty corpus".into(),
            ));
        }
        let start = corpus.len().saturating_sub(WINDOW_SIZE);
        self.dictionary = Some(corpus[start..].to_vec());
        Ok(())
    }

    fn compressed_length(&self, text: &str) -> Result<usize> {
        let dictionary = self.dictionary.as_ref().ok_or(Error::NotFitted)?;
        let input = text.as_bytes();

        let mut encoder = Compress::new(Compression::new(self.level), self.zlib_header);
        encoder
            .set_dictionary(dictionary)
            .map_err(|e| Error::codec("deflate", e))?;

        let mut out = Vec::with_capacity(input.len() + input.len() / 1000 + 64);
        loop {
            let consumed = encoder.total_in() as usize;
            let status = encoder
                .compress_vec(&input[consumed..], &mut out, FlushCompress::Finish)
                .map_err(|e| Error::codec("deflate", e))?;
            match status {
                Status::StreamEnd => break,
                Status::Ok | Status::BufError => out.reserve(out.capacity().max(64)),
            }
        }
        Ok(out.len())
    }

    fn dictionary_size(&self) -> Result<usize> {
        self.dictionary
            .as_ref()
            .map(Vec::len)
            .ok_or(Error::NotFitted)
    }
}
