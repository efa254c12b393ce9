use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Idle -> SequenceBuilt
/// - SequenceBuilt -> Previewing
/// - Previewing -> Playing
/// - Playing -> RoundEnded
/// - any -> SequenceBuilt, on setup
/// - any -> Idle, on dispose
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    #[default]
    Idle,
    SequenceBuilt,
    Previewing,
    Playing,
    RoundEnded,
}

impl RoundPhase {
    pub const fn is_interactive(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::RoundEnded)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The cell was still handling a previous selection.
    Ignored,
    Advanced,
    Won,
    Missed,
}

impl SelectOutcome {
    pub const fn has_update(self) -> bool {
        use SelectOutcome::*;
        match self {
            Ignored => false,
            Advanced => true,
            Won => true,
            Missed => true,
        }
    }

    pub const fn ends_round(self) -> bool {
        matches!(self, Self::Won | Self::Missed)
    }
}

#[derive(Debug)]
struct Round {
    level: Level,
    sequence: Sequence,
    results: StepResults,
    current_step: usize,
    current_target: CellIndex,
}

impl Round {
    fn new(level: Level, sequence: Sequence) -> Result<Self> {
        let expected = Sequence::len_for_level(level);
        if sequence.len() != expected {
            return Err(RoundError::WrongSequenceLength {
                level,
                expected,
                actual: sequence.len(),
            });
        }
        let current_target = sequence.first().ok_or(RoundError::NoSequence)?.index;
        let results = StepResults::for_sequence(&sequence);
        Ok(Self {
            level,
            sequence,
            results,
            current_step: 0,
            current_target,
        })
    }

    fn is_complete(&self) -> bool {
        self.current_step >= self.sequence.len()
    }
}

/// Runs one round at a time: builds the sequence, shows it, then checks the player's
/// selections against it.
#[derive(Debug)]
pub struct RoundController<G> {
    generator: G,
    timing: PreviewTiming,
    board: Option<Board>,
    round: Option<Round>,
    phase: RoundPhase,
    generation: u32,
}

impl<G: SequenceGenerator> RoundController<G> {
    pub fn new(generator: G, timing: PreviewTiming) -> Self {
        Self {
            generator,
            timing,
            board: None,
            round: None,
            phase: RoundPhase::Idle,
            generation: 0,
        }
    }

    /// Discards the current round and prepares a new sequence for `level`.
    ///
    /// A sequence that does not have `level + 1` steps is refused and leaves the
    /// controller idle.
    pub fn setup(&mut self, level: Level) -> Result<()> {
        let sequence = self.generator.generate(level);
        log::debug!("seq level={} [{}]", level, sequence);
        let round = match Round::new(level, sequence) {
            Ok(round) => round,
            Err(err) => {
                log::warn!("generator broke the round: {}", err);
                self.dispose();
                return Err(err);
            }
        };

        self.dispose_board();
        self.generation = self.generation.wrapping_add(1);

        let mut board = Board::new();
        board.show();
        for index in CellIndex::all() {
            board.append(Cell::inert(index));
        }
        self.board = Some(board);

        self.round = Some(round);
        self.phase = RoundPhase::SequenceBuilt;
        Ok(())
    }

    /// Starts showing the sequence from the first step.
    pub fn preview(&mut self) -> Result<ScheduledTick> {
        self.preview_from(0)
    }

    /// Starts showing the sequence from `start_at`. Starting at or past the end goes
    /// straight to play after the lead-in.
    pub fn preview_from(&mut self, start_at: usize) -> Result<ScheduledTick> {
        if self.round.is_none() {
            return Err(RoundError::NoSequence);
        }
        if !matches!(
            self.phase,
            RoundPhase::SequenceBuilt | RoundPhase::Previewing
        ) {
            return Err(RoundError::NotPreviewable);
        }

        // restarting a running preview orphans its pending tick
        self.generation = self.generation.wrapping_add(1);
        self.phase = RoundPhase::Previewing;
        log::debug!("preview from step {}", start_at);
        Ok(self.tick(self.timing.lead_in, PreviewStage::LeadIn(start_at)))
    }

    /// Applies one scheduled preview action.
    pub fn advance_preview(&mut self, token: PreviewToken) -> Result<PreviewAdvance> {
        if token.generation != self.generation || self.phase != RoundPhase::Previewing {
            return Err(RoundError::StalePreview);
        }
        let round = self.round.as_ref().ok_or(RoundError::NoSequence)?;

        use PreviewStage::*;
        let step = match token.stage {
            LeadIn(i) | Hold(i) | Release(i) => round.sequence.get(i).copied(),
        };

        Ok(match (token.stage, step) {
            (LeadIn(_), None) => {
                self.play()?;
                PreviewAdvance::Finished
            }
            (LeadIn(i), Some(step)) => {
                self.toggle_cell(step.index, true);
                let pulse = self.timing.pulse(step.level);
                PreviewAdvance::Continue(self.tick(pulse, Hold(i)))
            }
            (Hold(i), Some(step)) => {
                self.toggle_cell(step.index, true);
                let pulse = self.timing.pulse(step.level);
                PreviewAdvance::Continue(self.tick(pulse, Release(i)))
            }
            (Release(i), Some(step)) => {
                self.toggle_cell(step.index, false);
                PreviewAdvance::Continue(self.tick(self.timing.lead_in, LeadIn(i + 1)))
            }
            // hold and release are only ever scheduled for existing steps
            (Hold(_) | Release(_), None) => return Err(RoundError::StalePreview),
        })
    }

    /// Swaps the preview cells for interactive ones and starts accepting selections.
    pub fn play(&mut self) -> Result<()> {
        if self.phase.is_finished() {
            return Err(RoundError::AlreadyEnded);
        }
        let round = self.round.as_mut().ok_or(RoundError::NoSequence)?;
        let board = self.board.as_mut().ok_or(RoundError::NoSequence)?;

        for mut cell in board.take_cells() {
            cell.dispose();
        }
        for index in CellIndex::all() {
            board.append(Cell::interactive(index));
        }

        if let Some(step) = round.sequence.get(round.current_step) {
            round.current_target = step.index;
        }
        self.phase = RoundPhase::Playing;
        log::debug!("play level={} step={}", round.level, round.current_step);
        Ok(())
    }

    /// Setup followed by preview.
    pub fn start(&mut self, level: Level) -> Result<ScheduledTick> {
        self.setup(level)?;
        self.preview()
    }

    /// Checks a selection of `index` against the current target.
    pub fn select(
        &mut self,
        index: CellIndex,
        timestamp: Timestamp,
        host: &mut impl RoundHost,
    ) -> Result<SelectOutcome> {
        match self.phase {
            RoundPhase::Playing => {}
            RoundPhase::RoundEnded => return Err(RoundError::AlreadyEnded),
            _ => return Err(RoundError::NotPlaying),
        }

        let lock = self
            .board
            .as_ref()
            .and_then(|board| board.cell(index))
            .and_then(Cell::input_lock)
            .cloned()
            .ok_or(RoundError::NotPlaying)?;
        let Some(_guard) = lock.try_acquire() else {
            log::debug!("cell {} busy, selection dropped", index);
            return Ok(SelectOutcome::Ignored);
        };

        let round = self.round.as_mut().ok_or(RoundError::NoSequence)?;
        let step = round.current_step;
        let correct = index == round.current_target;
        round.results.record(step, correct);
        host.on_click(timestamp, round.level, step, correct);

        if !correct {
            log::info!("level {} lost at step {}", round.level, step);
            self.phase = RoundPhase::RoundEnded;
            host.on_finish_round(false);
            return Ok(SelectOutcome::Missed);
        }

        round.current_step += 1;
        if round.is_complete() {
            log::info!("level {} won", round.level);
            self.phase = RoundPhase::RoundEnded;
            host.on_finish_round(true);
            return Ok(SelectOutcome::Won);
        }

        round.current_target = round.sequence[round.current_step].index;
        Ok(SelectOutcome::Advanced)
    }

    /// Tears down the board and drops the round. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        self.dispose_board();
        self.round = None;
        self.generation = self.generation.wrapping_add(1);
        self.phase = RoundPhase::Idle;
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn timing(&self) -> &PreviewTiming {
        &self.timing
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn level(&self) -> Option<Level> {
        self.round.as_ref().map(|round| round.level)
    }

    pub fn sequence(&self) -> Option<&Sequence> {
        self.round.as_ref().map(|round| &round.sequence)
    }

    pub fn step_results(&self) -> Option<&StepResults> {
        self.round.as_ref().map(|round| &round.results)
    }

    pub fn current_step(&self) -> Option<usize> {
        self.round.as_ref().map(|round| round.current_step)
    }

    /// Cell the player has to select next, while the round is still open.
    pub fn current_target(&self) -> Option<CellIndex> {
        self.round
            .as_ref()
            .filter(|round| !round.is_complete())
            .map(|round| round.current_target)
    }

    fn tick(&self, delay: Millis, stage: PreviewStage) -> ScheduledTick {
        ScheduledTick {
            delay,
            token: PreviewToken {
                generation: self.generation,
                stage,
            },
        }
    }

    fn toggle_cell(&mut self, index: CellIndex, on: bool) {
        if let Some(cell) = self.board.as_mut().and_then(|board| board.cell_mut(index)) {
            cell.toggle_content(on);
        }
    }

    fn dispose_board(&mut self) {
        if let Some(mut board) = self.board.take() {
            board.dispose();
        }
    }
}
