// CorpusIndex: task/video index over a frame-per-file video corpus
//
// Expected layout:
//
//   root/
//     task_a/
//       video_0001/
//         video_0001_0001.png
//         video_0001_0002.png
//         ...
//       video_0002/
//     task_b/
//       ...
//
// Tasks and videos are sorted by name when the index is built; that order is
// the "discovery order" used by sequential sampling. The directory tree is
// scanned once. Frame counts are filled in lazily, one video at a time, and
// cached; a corpus that changes on disk needs a new index.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::info;

use vidpred_core::{Error, Result};

use crate::config::TaskSelector;

/// Sorted names of the subdirectories of `dir`.
fn sorted_subdirs(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Immutable task → videos index plus a lazily filled frame-count cache.
#[derive(Debug)]
pub struct CorpusIndex {
    root: PathBuf,
    extension: String,
    tasks: Vec<String>,
    videos: HashMap<String, Vec<String>>,
    frame_counts: HashMap<(String, String), usize>,
}

impl CorpusIndex {
    /// Scan `root` for the selected tasks and their videos.
    pub fn scan(root: impl AsRef<Path>, selector: &TaskSelector, extension: &str) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(Error::MissingDataDirectory(root));
        }

        let tasks = match selector {
            TaskSelector::All => sorted_subdirs(&root)?,
            TaskSelector::Named(name) => {
                if !root.join(name).is_dir() {
                    return Err(Error::UnknownTask {
                        task: name.clone(),
                        root,
                    });
                }
                vec![name.clone()]
            }
        };

        let mut videos = HashMap::with_capacity(tasks.len());
        for task in &tasks {
            videos.insert(task.clone(), sorted_subdirs(&root.join(task))?);
        }

        let index = CorpusIndex {
            root,
            extension: extension.to_string(),
            tasks,
            videos,
            frame_counts: HashMap::new(),
        };
        info!(
            root = %index.root.display(),
            tasks = index.tasks.len(),
            videos = index.total_videos(),
            "corpus indexed"
        );
        Ok(index)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Task names in discovery order.
    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    /// Video ids of `task` in discovery order (empty for an unknown task).
    pub fn videos(&self, task: &str) -> &[String] {
        self.videos.get(task).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn num_videos(&self, task: &str) -> usize {
        self.videos(task).len()
    }

    pub fn total_videos(&self) -> usize {
        self.videos.values().map(Vec::len).sum()
    }

    /// Tasks that contain at least one video.
    pub fn non_empty_tasks(&self) -> Vec<&str> {
        self.tasks
            .iter()
            .filter(|t| self.num_videos(t) > 0)
            .map(String::as_str)
            .collect()
    }

    pub fn video_dir(&self, task: &str, video: &str) -> PathBuf {
        self.root.join(task).join(video)
    }

    /// Path of the frame at 0-based `index`: `<video>_NNNN.<ext>` with
    /// `NNNN = index + 1`.
    pub fn frame_path(&self, task: &str, video: &str, index: usize) -> PathBuf {
        self.video_dir(task, video)
            .join(format!("{video}_{:04}.{}", index + 1, self.extension))
    }

    /// Number of frame files in a video directory. Counted on first use, then
    /// served from the cache.
    pub fn frame_count(&mut self, task: &str, video: &str) -> Result<usize> {
        let key = (task.to_string(), video.to_string());
        if let Some(&n) = self.frame_counts.get(&key) {
            return Ok(n);
        }
        let dir = self.video_dir(task, video);
        let mut n = 0;
        for entry in std::fs::read_dir(&dir).map_err(|e| Error::io(&dir, e))? {
            let entry = entry.map_err(|e| Error::io(&dir, e))?;
            let path = entry.path();
            let matches_ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(&self.extension))
                .unwrap_or(false);
            if matches_ext && path.is_file() {
                n += 1;
            }
        }
        self.frame_counts.insert(key, n);
        Ok(n)
    }
}
