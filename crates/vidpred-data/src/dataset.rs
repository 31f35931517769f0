// SequenceDataset trait: indexed access to sampled sequences

use vidpred_core::{Result, Sequence};

/// Result of one sampling attempt.
///
/// `Unavailable` and `Exhausted` are normal outcomes, not errors: the first
/// means "try again with another index/seed", the second means a sequential
/// pass has visited every video.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleOutcome {
    Sequence(Sequence),
    /// The chosen video is too short for the requested window.
    Unavailable,
    /// Sequential iteration ran past the last video.
    Exhausted,
}

impl SampleOutcome {
    pub fn is_sequence(&self) -> bool {
        matches!(self, SampleOutcome::Sequence(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, SampleOutcome::Unavailable)
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, SampleOutcome::Exhausted)
    }

    /// The sampled sequence, if there is one.
    pub fn into_sequence(self) -> Option<Sequence> {
        match self {
            SampleOutcome::Sequence(seq) => Some(seq),
            _ => None,
        }
    }
}

/// A source of sequences addressed by index.
///
/// Sampling is stateful (a random stream, cached frame counts), so `get`
/// takes `&mut self`.
pub trait SequenceDataset {
    /// Number of indices the dataset answers for. Random samplers report a
    /// nominal size.
    fn len(&self) -> usize;

    /// Whether the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample at position `index`.
    fn get(&mut self, index: usize) -> Result<SampleOutcome>;

    /// Optional human-readable name.
    fn name(&self) -> &str {
        "dataset"
    }
}
