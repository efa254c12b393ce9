use core::fmt;
use core::ops::Index;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Sequences up to this length never allocate.
const INLINE_STEPS: usize = 16;

/// One target the player has to select, tagged with the level it was generated for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceStep {
    pub index: CellIndex,
    pub level: Level,
}

/// Ordered targets of a round, never empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSequence")]
pub struct Sequence {
    steps: SmallVec<[SequenceStep; INLINE_STEPS]>,
}

#[derive(Deserialize)]
struct RawSequence {
    steps: SmallVec<[SequenceStep; INLINE_STEPS]>,
}

impl TryFrom<RawSequence> for Sequence {
    type Error = RoundError;

    fn try_from(raw: RawSequence) -> Result<Self> {
        Self::from_steps(raw.steps)
    }
}

impl Sequence {
    /// Number of steps a round at `level` asks for.
    pub const fn len_for_level(level: Level) -> usize {
        level as usize + 1
    }

    pub(crate) fn from_steps(steps: impl IntoIterator<Item = SequenceStep>) -> Result<Self> {
        let steps: SmallVec<_> = steps.into_iter().collect();
        if steps.is_empty() {
            return Err(RoundError::NoSequence);
        }
        Ok(Self { steps })
    }

    /// Builds a sequence for `level` out of raw cell indices.
    pub fn from_indices(level: Level, indices: &[u8]) -> Result<Self> {
        let steps = indices
            .iter()
            .map(|&index| {
                CellIndex::new(index).map(|index| SequenceStep { index, level })
            })
            .collect::<Result<SmallVec<[SequenceStep; INLINE_STEPS]>>>()?;
        Self::from_steps(steps)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, step: usize) -> Option<&SequenceStep> {
        self.steps.get(step)
    }

    pub fn first(&self) -> Option<&SequenceStep> {
        self.steps.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SequenceStep> {
        self.steps.iter()
    }

    pub fn indices(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.steps.iter().map(|step| step.index)
    }
}

impl Index<usize> for Sequence {
    type Output = SequenceStep;

    fn index(&self, step: usize) -> &Self::Output {
        &self.steps[step]
    }
}

/// Lists the targets as players count them, from 1.
impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.indices().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}

/// Outcome recorded for each step once the player reaches it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResults {
    results: SmallVec<[Option<bool>; INLINE_STEPS]>,
}

impl StepResults {
    pub(crate) fn for_sequence(sequence: &Sequence) -> Self {
        Self {
            results: core::iter::repeat_n(None, sequence.len()).collect(),
        }
    }

    pub(crate) fn record(&mut self, step: usize, correct: bool) {
        if let Some(slot) = self.results.get_mut(step) {
            *slot = Some(correct);
        }
    }

    /// `None` until the player has answered `step`.
    pub fn get(&self, step: usize) -> Option<bool> {
        self.results.get(step).copied().flatten()
    }

    pub fn answered(&self) -> usize {
        self.results.iter().filter(|result| result.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<bool>> + '_ {
        self.results.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_indices_tags_every_step_with_the_level() {
        let sequence = Sequence::from_indices(2, &[0, 8, 8]).unwrap();

        assert_eq!(sequence.len(), 3);
        assert!(sequence.iter().all(|step| step.level == 2));
        assert_eq!(sequence.first().map(|step| step.index.get()), Some(0));
    }

    #[test]
    fn from_indices_rejects_empty_and_out_of_range() {
        assert_eq!(Sequence::from_indices(0, &[]), Err(RoundError::NoSequence));
        assert_eq!(
            Sequence::from_indices(1, &[3, 9]),
            Err(RoundError::InvalidCellIndex(9))
        );
    }

    #[test]
    fn deserializing_checks_the_steps() {
        let empty = serde_json::from_str::<Sequence>(r#"{"steps":[]}"#);
        assert!(empty.is_err());

        let sequence =
            serde_json::from_str::<Sequence>(r#"{"steps":[{"index":4,"level":0}]}"#).unwrap();
        assert_eq!(sequence, Sequence::from_indices(0, &[4]).unwrap());

        let out_of_range = serde_json::from_str::<Sequence>(r#"{"steps":[{"index":9,"level":0}]}"#);
        assert!(out_of_range.is_err());
    }

    #[test]
    fn display_counts_cells_from_one() {
        let sequence = Sequence::from_indices(2, &[0, 4, 8]).unwrap();
        assert_eq!(alloc::format!("{}", sequence), "1,5,9");
    }

    #[test]
    fn step_results_track_answers_separately_from_steps() {
        let sequence = Sequence::from_indices(2, &[1, 2, 3]).unwrap();
        let mut results = StepResults::for_sequence(&sequence);
        assert_eq!(results.answered(), 0);

        results.record(0, true);
        results.record(1, false);
        results.record(7, true);

        assert_eq!(results.get(0), Some(true));
        assert_eq!(results.get(1), Some(false));
        assert_eq!(results.get(2), None);
        assert_eq!(results.answered(), 2);
    }
}
