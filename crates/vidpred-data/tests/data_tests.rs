// Tests for vidpred-data: corpus index, sampler, implausibility, loader

use std::path::Path;

use image::{Rgb, RgbImage};
use tempfile::TempDir;

use vidpred_core::{Error, Sequence};
use vidpred_data::{
    ChannelMode, CorpusIndex, Implausibility, ImplausibilityPolicy, SampleOutcome, SamplerConfig,
    SequenceDataset, SequenceLoader, SequenceLoaderConfig, SequenceSampler, TaskSelector,
};

const SIZE: u32 = 8;

// Corpus fixtures
//
// Frame t (0-based) of video number v is a flat 8x8 image with
// R = 5 * t, G = 20 * v, B = 0, so decoded pixels identify their source.

fn write_video(root: &Path, task: &str, video: &str, number: u8, frames: usize) {
    let dir = root.join(task).join(video);
    std::fs::create_dir_all(&dir).unwrap();
    for t in 0..frames {
        let img = RgbImage::from_pixel(SIZE, SIZE, Rgb([(5 * t) as u8, 20 * number, 0]));
        img.save(dir.join(format!("{video}_{:04}.png", t + 1))).unwrap();
    }
}

/// Two tasks: "gravity" with three 30-frame videos and one 4-frame video,
/// "permanence" with two 30-frame videos.
fn build_corpus() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_video(root, "gravity", "g_a", 1, 30);
    write_video(root, "gravity", "g_b", 2, 30);
    write_video(root, "gravity", "g_c", 3, 4);
    write_video(root, "gravity", "g_d", 4, 30);
    write_video(root, "permanence", "p_a", 5, 30);
    write_video(root, "permanence", "p_b", 6, 30);
    tmp
}

fn frame_index(seq: &Sequence, t: usize) -> usize {
    (seq.frame(t).get(0, 0, 0) * 255.0 / 5.0).round() as usize
}

fn video_number(seq: &Sequence, t: usize) -> usize {
    (seq.frame(t).get(1, 0, 0) * 255.0 / 20.0).round() as usize
}

fn frame_indices(seq: &Sequence) -> Vec<usize> {
    (0..seq.len()).map(|t| frame_index(seq, t)).collect()
}

fn expect_sequence(outcome: SampleOutcome) -> Sequence {
    match outcome {
        SampleOutcome::Sequence(seq) => seq,
        other => panic!("expected a sequence, got {other:?}"),
    }
}

fn config(root: &Path) -> SamplerConfig {
    SamplerConfig::new(root).seq_len(10).image_size(SIZE as usize)
}

// Corpus index

#[test]
fn test_corpus_index_discovery_order() {
    let tmp = build_corpus();
    let index = CorpusIndex::scan(tmp.path(), &TaskSelector::All, "png").unwrap();
    assert_eq!(index.tasks(), &["gravity".to_string(), "permanence".to_string()]);
    assert_eq!(index.videos("gravity"), &["g_a", "g_b", "g_c", "g_d"]);
    assert_eq!(index.total_videos(), 6);
    assert!(index.videos("missing").is_empty());
}

#[test]
fn test_corpus_frame_path_format() {
    let tmp = build_corpus();
    let index = CorpusIndex::scan(tmp.path(), &TaskSelector::All, "png").unwrap();
    let p = index.frame_path("gravity", "g_a", 0);
    assert!(p.ends_with("gravity/g_a/g_a_0001.png"));
    let p = index.frame_path("gravity", "g_a", 41);
    assert!(p.ends_with("gravity/g_a/g_a_0042.png"));
}

#[test]
fn test_corpus_frame_count_is_cached() {
    let tmp = build_corpus();
    let mut index = CorpusIndex::scan(tmp.path(), &TaskSelector::All, "png").unwrap();
    assert_eq!(index.frame_count("gravity", "g_c").unwrap(), 4);
    write_video(tmp.path(), "gravity", "g_c", 3, 6);
    assert_eq!(index.frame_count("gravity", "g_c").unwrap(), 4);
}

#[test]
fn test_corpus_ignores_other_extensions() {
    let tmp = build_corpus();
    std::fs::write(tmp.path().join("gravity/g_a/notes.txt"), "x").unwrap();
    let mut index = CorpusIndex::scan(tmp.path(), &TaskSelector::All, "png").unwrap();
    assert_eq!(index.frame_count("gravity", "g_a").unwrap(), 30);
}

// Construction errors

#[test]
fn test_missing_root_is_config_error() {
    let tmp = TempDir::new().unwrap();
    let err = SequenceSampler::new(config(&tmp.path().join("nope"))).err().unwrap();
    assert!(matches!(err, Error::MissingDataDirectory(_)));
}

#[test]
fn test_unknown_task() {
    let tmp = build_corpus();
    let cfg = config(tmp.path()).task(TaskSelector::Named("optics".into()));
    let err = SequenceSampler::new(cfg).err().unwrap();
    assert!(matches!(err, Error::UnknownTask { .. }));
}

#[test]
fn test_sequential_requires_single_task() {
    let tmp = build_corpus();
    let err = SequenceSampler::new(config(tmp.path()).sequential(true))
        .err()
        .unwrap();
    assert!(matches!(
        err,
        Error::SequentialRequiresSingleTask { tasks: 2 }
    ));
}

#[test]
fn test_empty_corpus_rejected_in_random_mode() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("empty_task")).unwrap();
    let err = SequenceSampler::new(config(tmp.path())).err().unwrap();
    assert!(matches!(err, Error::EmptyCorpus(_)));
}

#[test]
fn test_sequential_without_index_is_error() {
    let tmp = build_corpus();
    let cfg = config(tmp.path())
        .task(TaskSelector::Named("gravity".into()))
        .sequential(true);
    let mut sampler = SequenceSampler::new(cfg).unwrap();
    assert!(matches!(sampler.sequence(None), Err(Error::MissingIndex)));
}

// Random sampling

#[test]
fn test_random_sample_shape_and_contiguity() {
    let tmp = build_corpus();
    let mut sampler = SequenceSampler::new(config(tmp.path())).unwrap();
    let mut got = 0;
    for i in 0..40 {
        match sampler.sample(i).unwrap() {
            SampleOutcome::Sequence(seq) => {
                got += 1;
                assert_eq!(seq.len(), 10);
                assert_eq!(seq.frame_shape().dims(), [3, 8, 8]);
                for f in &seq {
                    assert!(f.data().iter().all(|&v| (0.0..=1.0).contains(&v)));
                }
                let idx = frame_indices(&seq);
                let start = idx[0];
                assert!(start <= 20);
                assert_eq!(idx, (start..start + 10).collect::<Vec<_>>());
                // every frame comes from the same video
                let v = video_number(&seq, 0);
                assert!((0..10).all(|t| video_number(&seq, t) == v));
            }
            SampleOutcome::Unavailable => {}
            SampleOutcome::Exhausted => panic!("random sampling never exhausts"),
        }
    }
    assert!(got > 0);
}

#[test]
fn test_random_draws_from_every_task() {
    let tmp = build_corpus();
    let mut sampler = SequenceSampler::new(config(tmp.path()).seq_len(2)).unwrap();
    let mut seen = std::collections::BTreeSet::new();
    for i in 0..200 {
        if let SampleOutcome::Sequence(seq) = sampler.sample(i).unwrap() {
            seen.insert(video_number(&seq, 0));
        }
    }
    assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_seeded_stream_is_reproducible() {
    let tmp = build_corpus();
    let draw = |first: usize| {
        let mut sampler = SequenceSampler::new(config(tmp.path())).unwrap();
        (first..first + 8)
            .map(|i| sampler.sample(i).unwrap())
            .collect::<Vec<_>>()
    };
    let a = draw(42);
    let b = draw(42);
    assert_eq!(a, b);
}

#[test]
fn test_config_seed_overrides_first_index() {
    let tmp = build_corpus();
    let draw = |first: usize| {
        let mut sampler = SequenceSampler::new(config(tmp.path()).seed(7)).unwrap();
        assert!(sampler.is_seeded());
        (first..first + 5)
            .map(|i| sampler.sample(i).unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(draw(0), draw(1000));
}

#[test]
fn test_short_video_is_unavailable() {
    let tmp = TempDir::new().unwrap();
    write_video(tmp.path(), "gravity", "short", 1, 4);
    let mut sampler = SequenceSampler::new(config(tmp.path())).unwrap();
    for i in 0..5 {
        assert_eq!(sampler.sample(i).unwrap(), SampleOutcome::Unavailable);
    }
}

#[test]
fn test_exact_length_video_starts_at_zero() {
    let tmp = TempDir::new().unwrap();
    write_video(tmp.path(), "gravity", "exact", 1, 10);
    let mut sampler = SequenceSampler::new(config(tmp.path())).unwrap();
    let seq = expect_sequence(sampler.sample(3).unwrap());
    assert_eq!(frame_indices(&seq), (0..10).collect::<Vec<_>>());
}

#[test]
fn test_stride_and_start_range() {
    let tmp = TempDir::new().unwrap();
    write_video(tmp.path(), "gravity", "long", 1, 30);
    let cfg = config(tmp.path()).seq_len(5).stride(3).start_range(4, 6);
    let mut sampler = SequenceSampler::new(cfg).unwrap();
    for i in 0..10 {
        let seq = expect_sequence(sampler.sample(i).unwrap());
        let idx = frame_indices(&seq);
        assert!((4..=6).contains(&idx[0]));
        for w in idx.windows(2) {
            assert_eq!(w[1] - w[0], 3);
        }
    }
}

#[test]
fn test_start_range_beyond_video_is_unavailable() {
    let tmp = TempDir::new().unwrap();
    write_video(tmp.path(), "gravity", "long", 1, 30);
    let cfg = config(tmp.path()).start_range(25, 40);
    let mut sampler = SequenceSampler::new(cfg).unwrap();
    assert_eq!(sampler.sample(0).unwrap(), SampleOutcome::Unavailable);
}

#[test]
fn test_gray_and_resize() {
    let tmp = build_corpus();
    let cfg = config(tmp.path())
        .channels(ChannelMode::Gray)
        .image_size(4);
    let mut sampler = SequenceSampler::new(cfg).unwrap();
    let seq = (0..20)
        .find_map(|i| sampler.sample(i).unwrap().into_sequence())
        .unwrap();
    assert_eq!(seq.frame_shape().dims(), [1, 4, 4]);
}

#[test]
fn test_missing_frame_file_is_fatal() {
    let tmp = TempDir::new().unwrap();
    // right count of png files, wrong names
    let dir = tmp.path().join("gravity").join("broken");
    std::fs::create_dir_all(&dir).unwrap();
    for t in 0..12 {
        RgbImage::new(SIZE, SIZE)
            .save(dir.join(format!("frame_{:04}.png", t + 1)))
            .unwrap();
    }
    let mut sampler = SequenceSampler::new(config(tmp.path())).unwrap();
    assert!(matches!(sampler.sample(0), Err(Error::Io { .. })));
}

#[test]
fn test_corrupt_frame_is_fatal() {
    let tmp = TempDir::new().unwrap();
    write_video(tmp.path(), "gravity", "bad", 1, 10);
    std::fs::write(tmp.path().join("gravity/bad/bad_0004.png"), b"not a png").unwrap();
    let mut sampler = SequenceSampler::new(config(tmp.path())).unwrap();
    assert!(matches!(sampler.sample(0), Err(Error::ImageDecode { .. })));
}

// Sequential sampling

#[test]
fn test_sequential_visits_each_video_once() {
    let tmp = build_corpus();
    let cfg = config(tmp.path())
        .task(TaskSelector::Named("gravity".into()))
        .sequential(true);
    let mut sampler = SequenceSampler::new(cfg).unwrap();
    assert_eq!(sampler.len(), 4);

    let mut visited = Vec::new();
    for i in 0..4 {
        match sampler.sample(i).unwrap() {
            SampleOutcome::Sequence(seq) => visited.push(video_number(&seq, 0)),
            SampleOutcome::Unavailable => visited.push(0),
            SampleOutcome::Exhausted => panic!("exhausted early at {i}"),
        }
    }
    // g_c (number 3) only has 4 frames
    assert_eq!(visited, vec![1, 2, 0, 4]);
    assert_eq!(sampler.sample(4).unwrap(), SampleOutcome::Exhausted);
    assert_eq!(sampler.sample(100).unwrap(), SampleOutcome::Exhausted);
}

// Implausibility injection

#[test]
fn test_sampler_occludes_window() {
    let tmp = TempDir::new().unwrap();
    write_video(tmp.path(), "gravity", "long", 1, 40);
    let imp = Implausibility::new(ImplausibilityPolicy::Occlude)
        .window(5, 3)
        .reference_frame(1);
    let cfg = config(tmp.path())
        .seq_len(12)
        .implausible(true)
        .implausibility(imp);
    let mut sampler = SequenceSampler::new(cfg).unwrap();
    let seq = expect_sequence(sampler.sample(9).unwrap());
    assert_eq!(seq.len(), 12);
    for t in 5..8 {
        assert_eq!(seq.frame(t), seq.frame(1));
    }
    let idx = frame_indices(&seq);
    let start = idx[0];
    for t in (0..5).chain(8..12) {
        assert_eq!(idx[t], start + t);
    }
}

#[test]
fn test_sampler_shift_matches_clean_draw() {
    let tmp = TempDir::new().unwrap();
    write_video(tmp.path(), "gravity", "long", 1, 40);
    let base = config(tmp.path()).seq_len(12);

    let mut clean = SequenceSampler::new(base.clone()).unwrap();
    let original = expect_sequence(clean.sample(5).unwrap());

    let imp = Implausibility::new(ImplausibilityPolicy::Shift).window(4, 3);
    let mut shifted = SequenceSampler::new(base.implausible(true).implausibility(imp)).unwrap();
    let result = expect_sequence(shifted.sample(5).unwrap());

    let len = original.len();
    for t in 0..len {
        if (4..len - 3).contains(&t) {
            assert_eq!(result.frame(t), original.frame(t + 3));
        } else {
            assert_eq!(result.frame(t), original.frame(t));
        }
    }
}

// Loader

#[test]
fn test_loader_batches_sequential_pass() {
    let tmp = build_corpus();
    let cfg = config(tmp.path())
        .task(TaskSelector::Named("gravity".into()))
        .sequential(true);
    let mut sampler = SequenceSampler::new(cfg).unwrap();
    let loader = SequenceLoader::new(&mut sampler, SequenceLoaderConfig::default().batch_size(2));
    let batches: Vec<_> = loader.map(|b| b.unwrap()).collect();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].shape().dims(), [2, 10, 3, 8, 8]);
    assert_eq!(batches[1].batch_size(), 1);
}
