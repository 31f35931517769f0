// SequenceSampler: fixed-length frame windows from a video corpus
//
// One call to `sample(index)`:
//
//   1. pick a video
//        random mode:      task uniformly (among tasks with videos), then video
//        sequential mode:  videos[index] of the single configured task,
//                          or Exhausted once index runs past the list
//   2. look up its frame count (cached after the first lookup)
//   3. Unavailable if the window does not fit
//   4. random start in [0, frames - span], optionally narrowed by start_range
//   5. decode frames start, start + stride, ...
//   6. optionally apply the implausibility edit
//
// The random stream is owned by the sampler. It is seeded once, either from
// `SamplerConfig::seed` at construction or from the index passed to the
// first `sample` call, and never reseeded. Replaying the same calls on a
// fresh sampler therefore reproduces the same sequences.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use vidpred_core::{Error, Result, Sequence};

use crate::config::SamplerConfig;
use crate::corpus::CorpusIndex;
use crate::dataset::{SampleOutcome, SequenceDataset};
use crate::decode::{FrameDecoder, ImageFileDecoder};
use crate::implausible::Edit;

/// Length reported by random-mode samplers, which can draw indefinitely.
pub const NOMINAL_LEN: usize = 1_000_000;

/// Return the stream, seeding it from `hint` (or OS entropy) on first use.
fn stream(rng: &mut Option<StdRng>, hint: Option<usize>) -> &mut StdRng {
    rng.get_or_insert_with(|| match hint {
        Some(seed) => StdRng::seed_from_u64(seed as u64),
        None => StdRng::from_entropy(),
    })
}

/// Samples fixed-length sequences from a `task/video/frame` corpus.
pub struct SequenceSampler<D: FrameDecoder = ImageFileDecoder> {
    config: SamplerConfig,
    index: CorpusIndex,
    decoder: D,
    rng: Option<StdRng>,
}

impl SequenceSampler<ImageFileDecoder> {
    /// Build a sampler that decodes frames with the `image` crate.
    pub fn new(config: SamplerConfig) -> Result<Self> {
        let size = config.image_size as u32;
        let decoder = ImageFileDecoder::new(config.channels).resize(size, size);
        Self::with_decoder(config, decoder)
    }
}

impl<D: FrameDecoder> SequenceSampler<D> {
    /// Build a sampler with a custom frame decoder.
    pub fn with_decoder(config: SamplerConfig, decoder: D) -> Result<Self> {
        config.validate()?;
        let index = CorpusIndex::scan(&config.root, &config.task, &config.extension)?;

        if config.sequential && index.tasks().len() != 1 {
            return Err(Error::SequentialRequiresSingleTask {
                tasks: index.tasks().len(),
            });
        }
        if !config.sequential && index.non_empty_tasks().is_empty() {
            return Err(Error::EmptyCorpus(config.root.clone()));
        }

        let rng = config.seed.map(StdRng::seed_from_u64);
        Ok(SequenceSampler {
            config,
            index,
            decoder,
            rng,
        })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn corpus(&self) -> &CorpusIndex {
        &self.index
    }

    /// Whether the random stream has been seeded yet.
    pub fn is_seeded(&self) -> bool {
        self.rng.is_some()
    }

    /// Draw one sequence, seeding the stream with `index` on the first call and
    /// applying the implausibility edit when enabled.
    pub fn sample(&mut self, index: usize) -> Result<SampleOutcome> {
        if self.rng.is_none() {
            self.rng = Some(StdRng::seed_from_u64(index as u64));
        }
        let outcome = self.sequence(Some(index))?;
        match outcome {
            SampleOutcome::Sequence(mut seq) if self.config.implausible => {
                let rng = stream(&mut self.rng, Some(index));
                self.config.implausibility.apply(&mut seq, rng)?;
                Ok(SampleOutcome::Sequence(seq))
            }
            other => Ok(other),
        }
    }

    /// Draw one uncorrupted sequence.
    ///
    /// In sequential mode `index` selects the video and is required. In random
    /// mode it is only used to seed the stream if nothing has seeded it yet.
    pub fn sequence(&mut self, index: Option<usize>) -> Result<SampleOutcome> {
        let (task, video) = if self.config.sequential {
            let idx = index.ok_or(Error::MissingIndex)?;
            let task = &self.index.tasks()[0];
            match self.index.videos(task).get(idx) {
                Some(video) => (task.clone(), video.clone()),
                None => return Ok(SampleOutcome::Exhausted),
            }
        } else {
            let rng = stream(&mut self.rng, index);
            let tasks = self.index.non_empty_tasks();
            let task = tasks
                .choose(rng)
                .ok_or_else(|| Error::EmptyCorpus(self.config.root.clone()))?
                .to_string();
            let video = self
                .index
                .videos(&task)
                .choose(rng)
                .ok_or_else(|| Error::EmptyCorpus(self.config.root.clone()))?
                .clone();
            (task, video)
        };

        let num_frames = self.index.frame_count(&task, &video)?;
        let span = self.config.window_span();
        if num_frames < span {
            warn!(%task, %video, num_frames, span, "video too short for window");
            return Ok(SampleOutcome::Unavailable);
        }

        let (mut lo, mut hi) = (0, num_frames - span);
        if let Some((min, max)) = self.config.start_range {
            lo = lo.max(min);
            hi = hi.min(max);
        }
        if lo > hi {
            warn!(
                %task,
                %video,
                num_frames,
                start_range = ?self.config.start_range,
                "no valid start offset"
            );
            return Ok(SampleOutcome::Unavailable);
        }
        let start = stream(&mut self.rng, index).gen_range(lo..=hi);
        debug!(%task, %video, start, num_frames, "sampling window");

        let mut frames = Vec::with_capacity(self.config.seq_len);
        for k in 0..self.config.seq_len {
            let path = self
                .index
                .frame_path(&task, &video, start + k * self.config.stride);
            frames.push(self.decoder.decode(&path)?);
        }
        Ok(SampleOutcome::Sequence(Sequence::new(frames)?))
    }

    /// Apply the configured implausibility edit to an already sampled sequence
    /// using this sampler's stream.
    pub fn abnormalize(&mut self, seq: &mut Sequence) -> Result<Edit> {
        let rng = stream(&mut self.rng, None);
        self.config.implausibility.apply(seq, rng)
    }
}

impl<D: FrameDecoder> SequenceDataset for SequenceSampler<D> {
    /// Sequential samplers report the number of videos; random samplers report
    /// [`NOMINAL_LEN`].
    fn len(&self) -> usize {
        if self.config.sequential {
            self.index.num_videos(&self.index.tasks()[0])
        } else {
            NOMINAL_LEN
        }
    }

    fn get(&mut self, index: usize) -> Result<SampleOutcome> {
        self.sample(index)
    }

    fn name(&self) -> &str {
        "SequenceSampler"
    }
}
