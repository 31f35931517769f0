// SamplerConfig: everything a SequenceSampler needs, validated up front
//
// The config is a plain serde struct so an experiment harness can load it from
// JSON alongside its own settings. Builder-style setters mirror the fields.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use vidpred_core::{Error, Result};

use crate::implausible::Implausibility;

/// Which tasks (top-level corpus directories) to sample from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskSelector {
    /// Every task directory found under the root. Written as `"ALL"`.
    All,
    /// A single named task.
    Named(String),
}

impl TaskSelector {
    pub fn parse(s: &str) -> Self {
        if s == "ALL" {
            TaskSelector::All
        } else {
            TaskSelector::Named(s.to_string())
        }
    }
}

impl From<String> for TaskSelector {
    fn from(s: String) -> Self {
        TaskSelector::parse(&s)
    }
}

impl From<TaskSelector> for String {
    fn from(t: TaskSelector) -> Self {
        t.to_string()
    }
}

impl fmt::Display for TaskSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskSelector::All => f.write_str("ALL"),
            TaskSelector::Named(name) => f.write_str(name),
        }
    }
}

/// Colour layout of decoded frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelMode {
    /// Three channels, R, G, B.
    #[default]
    Rgb,
    /// One luma channel.
    Gray,
}

impl ChannelMode {
    pub fn channels(self) -> usize {
        match self {
            ChannelMode::Rgb => 3,
            ChannelMode::Gray => 1,
        }
    }
}

fn default_seq_len() -> usize {
    20
}

fn default_image_size() -> usize {
    64
}

fn default_task() -> TaskSelector {
    TaskSelector::All
}

fn default_stride() -> usize {
    1
}

fn default_extension() -> String {
    "png".to_string()
}

/// Configuration for [`SequenceSampler`](crate::SequenceSampler).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Corpus root: `root/task/video/<video>_NNNN.<ext>`.
    pub root: PathBuf,
    /// Number of frames per sampled sequence.
    #[serde(default = "default_seq_len")]
    pub seq_len: usize,
    /// Frames are resized to `image_size x image_size` when they differ.
    #[serde(default = "default_image_size")]
    pub image_size: usize,
    #[serde(default = "default_task")]
    pub task: TaskSelector,
    /// Walk the videos of a single task in order instead of sampling randomly.
    #[serde(default)]
    pub sequential: bool,
    /// Corrupt every sampled sequence with `implausibility`.
    #[serde(default)]
    pub implausible: bool,
    #[serde(default)]
    pub implausibility: Implausibility,
    #[serde(default)]
    pub channels: ChannelMode,
    /// Inclusive bounds on the random start offset.
    #[serde(default)]
    pub start_range: Option<(usize, usize)>,
    /// Distance between consecutive sampled frames.
    #[serde(default = "default_stride")]
    pub stride: usize,
    /// Frame file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Seed the random stream at construction instead of on the first sample.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SamplerConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SamplerConfig {
            root: root.into(),
            seq_len: default_seq_len(),
            image_size: default_image_size(),
            task: default_task(),
            sequential: false,
            implausible: false,
            implausibility: Implausibility::default(),
            channels: ChannelMode::default(),
            start_range: None,
            stride: default_stride(),
            extension: default_extension(),
            seed: None,
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: SamplerConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json_str(&text)
    }

    pub fn seq_len(mut self, n: usize) -> Self {
        self.seq_len = n;
        self
    }

    pub fn image_size(mut self, n: usize) -> Self {
        self.image_size = n;
        self
    }

    pub fn task(mut self, task: TaskSelector) -> Self {
        self.task = task;
        self
    }

    pub fn sequential(mut self, yes: bool) -> Self {
        self.sequential = yes;
        self
    }

    pub fn implausible(mut self, yes: bool) -> Self {
        self.implausible = yes;
        self
    }

    pub fn implausibility(mut self, imp: Implausibility) -> Self {
        self.implausibility = imp;
        self
    }

    pub fn channels(mut self, mode: ChannelMode) -> Self {
        self.channels = mode;
        self
    }

    pub fn start_range(mut self, min: usize, max: usize) -> Self {
        self.start_range = Some((min, max));
        self
    }

    pub fn stride(mut self, s: usize) -> Self {
        self.stride = s;
        self
    }

    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.extension = ext.into();
        self
    }

    pub fn seed(mut self, s: u64) -> Self {
        self.seed = Some(s);
        self
    }

    /// Number of on-disk frames one sampled window covers.
    pub fn window_span(&self) -> usize {
        (self.seq_len.max(1) - 1) * self.stride + 1
    }

    /// Check value ranges. Filesystem checks happen when the sampler scans the
    /// corpus.
    pub fn validate(&self) -> Result<()> {
        if self.seq_len == 0 {
            return Err(Error::InvalidConfig("seq_len must be at least 1".into()));
        }
        if self.stride == 0 {
            return Err(Error::InvalidConfig("stride must be at least 1".into()));
        }
        if self.image_size == 0 {
            return Err(Error::InvalidConfig("image_size must be at least 1".into()));
        }
        if let Some((min, max)) = self.start_range {
            if min > max {
                return Err(Error::InvalidConfig(format!(
                    "start_range ({min}, {max}) is empty"
                )));
            }
        }
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(Error::InvalidConfig(format!(
                "extension {:?} must be non-empty and given without a dot",
                self.extension
            )));
        }
        if self.implausible {
            self.implausibility.validate(self.seq_len)?;
        }
        Ok(())
    }
}
