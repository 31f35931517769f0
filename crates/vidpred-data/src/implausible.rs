// Implausibility injection: turn a plausible clip into an anomalous one
//
// Each edit overwrites part of a sampled sequence with frames taken from the
// same sequence, so the result still looks like video but breaks object
// permanence or continuity:
//
//   Occlude   frames [start, start+duration) := frame[reference_frame]
//             (the object vanishes, since the reference frame precedes it)
//   Freeze    frames [start, start+duration) := frame[start]
//             (the object stops, then teleports to where it should be)
//   Shift     frames [start, len-duration)   := frames [start+duration, len)
//             (the object jumps ahead and keeps moving)
//
// Windows are clamped to the sequence, so an edit never changes the length or
// the frame shape.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use vidpred_core::{Error, Result, Sequence};

/// Which edit to apply to a sampled sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImplausibilityPolicy {
    /// Leave the sequence untouched.
    None,
    Occlude,
    Freeze,
    Shift,
    /// Pick one of `Occlude`, `Freeze`, `Shift` uniformly per sequence.
    Random,
}

/// The concrete edit that was applied to one sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    None,
    Occlude,
    Freeze,
    Shift,
}

/// Parameters of the implausibility edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Implausibility {
    pub policy: ImplausibilityPolicy,
    /// First frame of the edited window.
    pub start: usize,
    /// Length of the edited window (or the jump distance for `Shift`).
    pub duration: usize,
    /// Frame copied over the window by `Occlude`.
    pub reference_frame: usize,
}

impl Default for Implausibility {
    fn default() -> Self {
        Implausibility {
            policy: ImplausibilityPolicy::Occlude,
            start: 110,
            duration: 7,
            reference_frame: 30,
        }
    }
}

impl Implausibility {
    pub fn new(policy: ImplausibilityPolicy) -> Self {
        Implausibility {
            policy,
            ..Default::default()
        }
    }

    pub fn window(mut self, start: usize, duration: usize) -> Self {
        self.start = start;
        self.duration = duration;
        self
    }

    pub fn reference_frame(mut self, idx: usize) -> Self {
        self.reference_frame = idx;
        self
    }

    /// Reject parameters that cannot be applied to sequences of `seq_len` frames.
    pub fn validate(&self, seq_len: usize) -> Result<()> {
        let uses_reference = matches!(
            self.policy,
            ImplausibilityPolicy::Occlude | ImplausibilityPolicy::Random
        );
        if uses_reference && self.reference_frame >= seq_len {
            return Err(Error::InvalidConfig(format!(
                "reference frame {} is outside a {seq_len}-frame sequence",
                self.reference_frame
            )));
        }
        Ok(())
    }

    /// Resolve `Random` to a concrete edit using `rng`.
    pub fn choose(&self, rng: &mut impl Rng) -> Edit {
        match self.policy {
            ImplausibilityPolicy::None => Edit::None,
            ImplausibilityPolicy::Occlude => Edit::Occlude,
            ImplausibilityPolicy::Freeze => Edit::Freeze,
            ImplausibilityPolicy::Shift => Edit::Shift,
            ImplausibilityPolicy::Random => match rng.gen_range(0..3) {
                0 => Edit::Occlude,
                1 => Edit::Freeze,
                _ => Edit::Shift,
            },
        }
    }

    /// Apply the configured edit to `seq` in place and report which one ran.
    pub fn apply(&self, seq: &mut Sequence, rng: &mut impl Rng) -> Result<Edit> {
        let edit = self.choose(rng);
        self.apply_edit(seq, edit)?;
        debug!(?edit, start = self.start, duration = self.duration, "implausibility applied");
        Ok(edit)
    }

    /// Apply a specific edit with this config's window.
    pub fn apply_edit(&self, seq: &mut Sequence, edit: Edit) -> Result<()> {
        let end = self.start.saturating_add(self.duration);
        match edit {
            Edit::None => {}
            Edit::Occlude => {
                if self.reference_frame >= seq.len() {
                    return Err(Error::InvalidConfig(format!(
                        "reference frame {} is outside a {}-frame sequence",
                        self.reference_frame,
                        seq.len()
                    )));
                }
                seq.fill_range(self.start..end, self.reference_frame);
            }
            Edit::Freeze => {
                if self.start < seq.len() {
                    seq.fill_range(self.start..end, self.start);
                }
            }
            Edit::Shift => seq.shift_left(self.start, self.duration),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use vidpred_core::{Frame, FrameShape};

    fn numbered(n: usize) -> Sequence {
        let shape = FrameShape::new(1, 2, 2);
        Sequence::new((0..n).map(|i| Frame::filled(shape, i as f64)).collect()).unwrap()
    }

    fn ids(seq: &Sequence) -> Vec<usize> {
        seq.iter().map(|f| f.data()[0] as usize).collect()
    }

    #[test]
    fn test_default_window() {
        let imp = Implausibility::default();
        assert_eq!(imp.policy, ImplausibilityPolicy::Occlude);
        assert_eq!((imp.start, imp.duration, imp.reference_frame), (110, 7, 30));
    }

    #[test]
    fn test_occlude_default_window_on_long_clip() {
        let mut seq = numbered(150);
        let mut rng = StdRng::seed_from_u64(0);
        let edit = Implausibility::default().apply(&mut seq, &mut rng).unwrap();
        assert_eq!(edit, Edit::Occlude);
        let got = ids(&seq);
        for (t, &id) in got.iter().enumerate() {
            if (110..117).contains(&t) {
                assert_eq!(id, 30);
            } else {
                assert_eq!(id, t);
            }
        }
    }

    #[test]
    fn test_freeze() {
        let mut seq = numbered(10);
        Implausibility::new(ImplausibilityPolicy::Freeze)
            .window(3, 4)
            .apply_edit(&mut seq, Edit::Freeze)
            .unwrap();
        assert_eq!(ids(&seq), vec![0, 1, 2, 3, 3, 3, 3, 7, 8, 9]);
    }

    #[test]
    fn test_shift() {
        let mut seq = numbered(10);
        Implausibility::new(ImplausibilityPolicy::Shift)
            .window(2, 3)
            .apply_edit(&mut seq, Edit::Shift)
            .unwrap();
        assert_eq!(ids(&seq), vec![0, 1, 5, 6, 7, 8, 9, 7, 8, 9]);
    }

    #[test]
    fn test_none_is_noop() {
        let mut seq = numbered(10);
        let before = seq.clone();
        let mut rng = StdRng::seed_from_u64(3);
        let edit = Implausibility::new(ImplausibilityPolicy::None)
            .apply(&mut seq, &mut rng)
            .unwrap();
        assert_eq!(edit, Edit::None);
        assert_eq!(seq, before);
    }

    #[test]
    fn test_window_past_end_is_clamped() {
        let mut seq = numbered(5);
        Implausibility::new(ImplausibilityPolicy::Freeze)
            .window(3, 10)
            .apply_edit(&mut seq, Edit::Freeze)
            .unwrap();
        assert_eq!(ids(&seq), vec![0, 1, 2, 3, 3]);
        // start beyond the clip: nothing to freeze
        Implausibility::new(ImplausibilityPolicy::Freeze)
            .window(8, 2)
            .apply_edit(&mut seq, Edit::Freeze)
            .unwrap();
        assert_eq!(seq.len(), 5);
    }

    #[test]
    fn test_occlude_missing_reference_errors() {
        let mut seq = numbered(5);
        let res = Implausibility::default().apply_edit(&mut seq, Edit::Occlude);
        assert!(matches!(res, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_random_covers_all_edits() {
        let imp = Implausibility::new(ImplausibilityPolicy::Random);
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; 3];
        for _ in 0..200 {
            match imp.choose(&mut rng) {
                Edit::Occlude => seen[0] = true,
                Edit::Freeze => seen[1] = true,
                Edit::Shift => seen[2] = true,
                Edit::None => panic!("random never picks the no-op"),
            }
        }
        assert_eq!(seen, [true, true, true]);
    }
}
