use crate::*;
pub use random::*;

mod random;

pub trait SequenceGenerator {
    /// Produces the `level + 1` steps of a new round.
    fn generate(&mut self, level: Level) -> Sequence;
}

/// Replays fixed index lists, one per round, then repeats the last one.
///
/// Handy for scripted rounds where the targets must be known up front.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedSequenceGenerator {
    rounds: alloc::vec::Vec<alloc::vec::Vec<u8>>,
    next: usize,
}

impl ScriptedSequenceGenerator {
    pub fn new(rounds: impl IntoIterator<Item = alloc::vec::Vec<u8>>) -> Result<Self> {
        let rounds: alloc::vec::Vec<_> = rounds.into_iter().collect();
        if rounds.is_empty() || rounds.iter().any(|round| round.is_empty()) {
            return Err(RoundError::NoSequence);
        }
        if let Some(&index) = rounds.iter().flatten().find(|&&index| index >= CELL_COUNT) {
            return Err(RoundError::InvalidCellIndex(index));
        }
        Ok(Self { rounds, next: 0 })
    }
}

impl SequenceGenerator for ScriptedSequenceGenerator {
    fn generate(&mut self, level: Level) -> Sequence {
        let round = &self.rounds[self.next.min(self.rounds.len() - 1)];
        self.next = self.next.saturating_add(1);

        let wanted = Sequence::len_for_level(level);
        if round.len() != wanted {
            log::warn!(
                "Scripted round has {} steps but level {} wants {}, cycling",
                round.len(),
                level,
                wanted
            );
        }
        let steps = round
            .iter()
            .cycle()
            .take(wanted)
            .map(|&index| SequenceStep {
                index: CellIndex::new_unchecked(index),
                level,
            });
        Sequence::from_steps(steps).expect("scripted rounds are checked to be non-empty")
    }
}
