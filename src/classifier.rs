//! Classification by per-label compressors
//!
//! Each label gets one or more compressors whose dictionaries come from that
//! label's training texts. A query is scored by its compressed length against
//! every label's compressors, and labels with the smallest total win.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::debug;

use crate::compressor::{join_corpus, Compressor, CompressorProvider};
use crate::error::{Error, Result};

/// Compressors fitted for each label
type LabelModel<L> = BTreeMap<L, Vec<Box<dyn Compressor>>>;

/// Text classifier comparing compressed lengths against per-label dictionaries
///
/// Labels can be any ordered type. The label order breaks ties: when two labels
/// reach the same total score, the smaller label ranks first.
///
/// # Examples
///
/// ```
/// use fftc::{CompressionAlgorithm, CompressorClassifier};
///
/// let training = vec![
///     ("normal", "some normal sentence about the weather today"),
///     ("godzilla", "godzilla ate mars in June and then the moon"),
/// ];
/// let mut classifier = CompressorClassifier::new(CompressionAlgorithm::zstd(3));
/// classifier.fit(training)?;
/// println!("{:?}", classifier.predict("godzilla ate mars in June and then the moon")?);
/// # Ok::<(), fftc::Error>(())
/// ```
pub struct CompressorClassifier<L> {
    /// Source of fresh compressors, one per chunk
    provider: Box<dyn CompressorProvider>,
    /// Number of labels returned by `predict`
    top_k: usize,
    /// Upper bound on compressors fitted for a single label
    compressors_per_class: usize,
    /// Present once `fit` has succeeded
    model: Option<LabelModel<L>>,
}

/// Size of the contiguous chunks a non-empty group of `group_size` texts is
/// split into
fn chunk_size(group_size: usize, compressors_per_class: usize) -> usize {
    (group_size - 1) / compressors_per_class + 1
}

impl<L: Ord + Clone> CompressorClassifier<L> {
    /// Classifier with one compressor per label that predicts a single label
    pub fn new(provider: impl CompressorProvider + 'static) -> CompressorClassifier<L> {
        CompressorClassifier {
            provider: Box::new(provider),
            top_k: 1,
            compressors_per_class: 1,
            model: None,
        }
    }

    /// Split each label's texts across up to `compressors_per_class` compressors
    ///
    /// More compressors per label make scores more stable, at the cost of
    /// inference time proportional to their number.
    pub fn with_compressors_per_class(
        mut self,
        compressors_per_class: usize,
    ) -> Result<CompressorClassifier<L>> {
        if compressors_per_class < 1 {
            return Err(Error::InvalidConfiguration(
                "compressors_per_class must be at least 1".into(),
            ));
        }
        self.compressors_per_class = compressors_per_class;
        Ok(self)
    }

    /// Return the `top_k` best labels from `predict` instead of only the best one
    ///
    /// This is a cheat, not an evaluation mode: counting a prediction as correct
    /// whenever the true label is anywhere in the top k inflates accuracy a lot.
    /// Keep the default of 1 for real measurements. `classify` always returns a
    /// single label whatever is set here.
    pub fn with_top_k_cheat(mut self, top_k: usize) -> Result<CompressorClassifier<L>> {
        if top_k < 1 {
            return Err(Error::InvalidConfiguration(
                "top_k must be at least 1 (1 is correct, 2 or more is cheating)".into(),
            ));
        }
        self.top_k = top_k;
        Ok(self)
    }

    /// Number of labels returned by `predict`
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Upper bound on compressors per label
    pub fn compressors_per_class(&self) -> usize {
        self.compressors_per_class
    }

    /// Whether `fit` has succeeded at least once
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Trained labels, in tie-break order
    pub fn labels(&self) -> Vec<&L> {
        self.model
            .as_ref()
            .map(|model| model.keys().collect())
            .unwrap_or_default()
    }

    /// Number of compressors fitted for `label`
    pub fn compressor_count(&self, label: &L) -> Option<usize> {
        self.model.as_ref()?.get(label).map(Vec::len)
    }

    /// Fit one set of compressors per label, replacing any previous model
    ///
    /// Texts sharing a label are kept in encounter order and split into
    /// contiguous chunks of `ceil(group / compressors_per_class)` texts. Each
    /// chunk is joined with newlines and fitted into its own compressor. Chunks
    /// are fitted in parallel. If any compressor fails to fit, its error is
    /// returned and the previous model is kept.
    pub fn fit<S: AsRef<str>>(&mut self, training: impl IntoIterator<Item = (L, S)>) -> Result<()> {
        let mut groups: BTreeMap<L, Vec<String>> = BTreeMap::new();
        for (label, text) in training {
            groups
                .entry(label)
                .or_default()
                .push(text.as_ref().to_string());
        }
        if groups.is_empty() {
            return Err(Error::EmptyTrainingSet);
        }

        let mut owners = Vec::new();
        let mut jobs = Vec::new();
        for (label, texts) in &groups {
            let size = chunk_size(texts.len(), self.compressors_per_class);
            for chunk in texts.chunks(size) {
                let chunk: Vec<&str> = chunk.iter().map(String::as_str).collect();
                owners.push(label.clone());
                jobs.push((self.provider.provide(), join_corpus(&chunk)));
            }
        }

        let fitted: Vec<Result<()>> = jobs
            .par_iter_mut()
            .map(|(compressor, corpus)| compressor.fit(&[corpus.as_str()]))
            .collect();
        fitted.into_iter().collect::<Result<()>>()?;

        let mut model = LabelModel::new();
        for (label, (compressor, _)) in owners.into_iter().zip(jobs) {
            model.entry(label).or_insert_with(Vec::new).push(compressor);
        }
        debug!(
            labels = model.len(),
            compressors = model.values().map(Vec::len).sum::<usize>(),
            "Fitted compressor classifier"
        );
        self.model = Some(model);
        Ok(())
    }

    /// Compressed length of `text` against every compressor of every label
    pub fn score_table(&self, text: &str) -> Result<BTreeMap<L, Vec<usize>>> {
        let model = self.model.as_ref().ok_or(Error::NotFitted)?;
        model
            .iter()
            .map(|(label, compressors)| {
                let scores = compressors
                    .iter()
                    .map(|compressor| compressor.compressed_length(text))
                    .collect::<Result<Vec<usize>>>()?;
                Ok((label.clone(), scores))
            })
            .collect()
    }

    /// Summed score of every label, best (lowest) first
    pub fn scores(&self, text: &str) -> Result<Vec<(L, usize)>> {
        let mut scores: Vec<(L, usize)> = self
            .score_table(text)?
            .into_iter()
            .map(|(label, scores)| (label, scores.iter().sum()))
            .collect();
        // Stable sort: equal scores keep label order.
        scores.sort_by_key(|(_, score)| *score);
        Ok(scores)
    }

    /// The `top_k` labels with the lowest summed score, best first
    ///
    /// # Examples
    ///
    /// ```
    /// use fftc::{CompressionAlgorithm, CompressorClassifier};
    ///
    /// let mut classifier = CompressorClassifier::new(CompressionAlgorithm::zstd(3))
    ///     .with_top_k_cheat(2)?;
    /// classifier.fit([("a", "first label text"), ("b", "second label text"), ("c", "third")])?;
    /// assert_eq!(classifier.predict("second label text")?.len(), 2);
    /// # Ok::<(), fftc::Error>(())
    /// ```
    pub fn predict(&self, text: &str) -> Result<Vec<L>> {
        let scores = self.scores(text)?;
        if self.top_k > scores.len() {
            return Err(Error::InvalidConfiguration(format!(
                "top_k is {} but only {} labels were trained",
                self.top_k,
                scores.len()
            )));
        }
        Ok(scores
            .into_iter()
            .take(self.top_k)
            .map(|(label, _)| label)
            .collect())
    }

    /// The single best label for `text`
    pub fn classify(&self, text: &str) -> Result<L> {
        self.scores(text)?
            .into_iter()
            .next()
            .map(|(label, _)| label)
            .ok_or(Error::NotFitted)
    }

    /// Total size in bytes of every fitted dictionary
    pub fn dictionaries_size(&self) -> Result<usize> {
        let model = self.model.as_ref().ok_or(Error::NotFitted)?;
        model
            .values()
            .flatten()
            .map(|compressor| compressor.dictionary_size())
            .sum()
    }

    /// Share of `test_set` whose true label is among the predicted labels
    ///
    /// With the default `top_k` of 1 this is plain accuracy. With
    /// [`with_top_k_cheat`](Self::with_top_k_cheat) it is the inflated top-k
    /// accuracy and should not be reported as the model's performance.
    pub fn accuracy<S>(&self, test_set: &[(L, S)]) -> Result<f64>
    where
        L: Sync,
        S: AsRef<str> + Sync,
    {
        if test_set.is_empty() {
            return Err(Error::EmptyTestSet);
        }
        let hits = test_set
            .par_iter()
            .map(|(label, text)| {
                self.predict(text.as_ref())
                    .map(|predicted| predicted.contains(label))
            })
            .collect::<Result<Vec<bool>>>()?;
        let correct = hits.iter().filter(|hit| **hit).count();
        Ok(correct as f64 / test_set.len() as f64)
    }
}
