// SequenceLoader: collect sampled sequences into batches
//
// Walks dataset indices in order, skipping Unavailable draws, until a batch is
// full. An Exhausted outcome (or reaching `dataset.len()`) ends the pass: the
// sequences collected so far are returned as a final, smaller batch.

use tracing::warn;

use vidpred_core::{Error, Result, SequenceBatch};

use crate::dataset::{SampleOutcome, SequenceDataset};

/// Configuration for the SequenceLoader.
#[derive(Debug, Clone)]
pub struct SequenceLoaderConfig {
    /// Number of sequences per batch.
    pub batch_size: usize,
    /// Consecutive unavailable draws tolerated before giving up.
    pub max_attempts: usize,
    /// First dataset index to request.
    pub start_index: usize,
}

impl Default for SequenceLoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 16,
            max_attempts: 100,
            start_index: 0,
        }
    }
}

impl SequenceLoaderConfig {
    pub fn batch_size(mut self, bs: usize) -> Self {
        self.batch_size = bs;
        self
    }

    pub fn max_attempts(mut self, n: usize) -> Self {
        self.max_attempts = n;
        self
    }

    pub fn start_index(mut self, i: usize) -> Self {
        self.start_index = i;
        self
    }
}

/// Batches sequences drawn from a [`SequenceDataset`].
pub struct SequenceLoader<'a, D: SequenceDataset + ?Sized> {
    dataset: &'a mut D,
    config: SequenceLoaderConfig,
    next_index: usize,
    done: bool,
}

impl<'a, D: SequenceDataset + ?Sized> SequenceLoader<'a, D> {
    pub fn new(dataset: &'a mut D, config: SequenceLoaderConfig) -> Self {
        let next_index = config.start_index;
        Self {
            dataset,
            config,
            next_index,
            done: false,
        }
    }

    /// Index the next draw will request.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Collect the next batch, or `None` once the dataset is used up.
    pub fn next_batch(&mut self) -> Result<Option<SequenceBatch>> {
        if self.done {
            return Ok(None);
        }
        if self.config.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be at least 1".into()));
        }

        let mut sequences = Vec::with_capacity(self.config.batch_size);
        let mut misses = 0;
        while sequences.len() < self.config.batch_size {
            if self.next_index >= self.dataset.len() {
                self.done = true;
                break;
            }
            let index = self.next_index;
            self.next_index += 1;
            match self.dataset.get(index)? {
                SampleOutcome::Sequence(seq) => {
                    sequences.push(seq);
                    misses = 0;
                }
                SampleOutcome::Unavailable => {
                    misses += 1;
                    if misses >= self.config.max_attempts {
                        warn!(
                            dataset = self.dataset.name(),
                            index, misses, "loader stalled on unavailable samples"
                        );
                        self.done = true;
                        return Err(Error::SamplingStalled { attempts: misses });
                    }
                }
                SampleOutcome::Exhausted => {
                    self.done = true;
                    break;
                }
            }
        }

        if sequences.is_empty() {
            return Ok(None);
        }
        SequenceBatch::from_sequences(&sequences).map(Some)
    }
}

impl<'a, D: SequenceDataset + ?Sized> Iterator for SequenceLoader<'a, D> {
    type Item = Result<SequenceBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_batch() {
            Ok(Some(batch)) => Some(Ok(batch)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
