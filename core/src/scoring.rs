use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Receives the outcome of every selection and every round.
pub trait RoundHost {
    /// Called once per accepted selection while playing.
    fn on_click(&mut self, timestamp: Timestamp, level: Level, step: usize, correct: bool);

    /// Called exactly once per round, on completion or on the first mistake.
    fn on_finish_round(&mut self, won: bool);
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossPolicy {
    /// Play the same level again after a mistake.
    #[default]
    RetryLevel,
    /// Stop the game on the first lost round.
    EndGame,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub starting_level: Level,
    pub max_rounds: u32,
    pub on_loss: LossPolicy,
}

impl ScoringConfig {
    pub fn new(starting_level: Level, max_rounds: u32, on_loss: LossPolicy) -> Self {
        Self {
            starting_level,
            max_rounds: max_rounds.max(1),
            on_loss,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::new(1, 5, LossPolicy::RetryLevel)
    }
}

/// One row of the summary table.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Metric {
    Click {
        click_counter: u32,
        correct: bool,
        step_in_sequence: usize,
        level: Level,
        /// Since the first selection of the round.
        time_elapsed: Timestamp,
        /// Since the previous selection of the round.
        time_interval: Timestamp,
    },
    RoundTotal {
        total_time_elapsed: Timestamp,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextRound {
    Play(Level),
    GameOver,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct RoundClock {
    started_at: Option<Timestamp>,
    last_at: Option<Timestamp>,
    now: Timestamp,
}

impl RoundClock {
    /// Returns `(elapsed, interval)` for a selection at `timestamp`.
    fn lap(&mut self, timestamp: Timestamp) -> (Timestamp, Timestamp) {
        let started_at = *self.started_at.get_or_insert(timestamp);
        let last_at = self.last_at.replace(timestamp).unwrap_or(timestamp);
        self.now = timestamp;
        (timestamp - started_at, timestamp - last_at)
    }

    fn total(&self) -> Timestamp {
        self.started_at.map_or(0.0, |started_at| self.now - started_at)
    }
}

/// Collects metrics for a whole game and decides how it continues.
#[derive(Clone, Debug, PartialEq)]
pub struct Scoreboard {
    config: ScoringConfig,
    metrics: Vec<Metric>,
    click_counter: u32,
    clock: RoundClock,
    level: Level,
    rounds_played: u32,
    rounds_won: u32,
    next_round: Option<NextRound>,
    game_over: bool,
}

impl Scoreboard {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            metrics: Vec::new(),
            click_counter: 0,
            clock: RoundClock::default(),
            level: config.starting_level,
            rounds_played: 0,
            rounds_won: 0,
            next_round: None,
            game_over: false,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Level the next round should be played at.
    pub fn level(&self) -> Level {
        self.level
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn rounds_won(&self) -> u32 {
        self.rounds_won
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Hands out the decision made at the end of the last round, once.
    pub fn take_next_round(&mut self) -> Option<NextRound> {
        self.next_round.take()
    }

    /// Starts over with the same configuration.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }
}

impl RoundHost for Scoreboard {
    fn on_click(&mut self, timestamp: Timestamp, level: Level, step: usize, correct: bool) {
        let (time_elapsed, time_interval) = self.clock.lap(timestamp);
        self.metrics.push(Metric::Click {
            click_counter: self.click_counter,
            correct,
            step_in_sequence: step,
            level,
            time_elapsed,
            time_interval,
        });
        self.click_counter = self.click_counter.saturating_add(1);
    }

    fn on_finish_round(&mut self, won: bool) {
        self.metrics.push(Metric::RoundTotal {
            total_time_elapsed: self.clock.total(),
        });
        self.clock = RoundClock::default();

        self.rounds_played = self.rounds_played.saturating_add(1);
        if won {
            self.rounds_won = self.rounds_won.saturating_add(1);
            self.level = self.level.saturating_add(1);
        }

        let out_of_rounds = self.rounds_played >= self.config.max_rounds;
        let lost_for_good = !won && self.config.on_loss == LossPolicy::EndGame;
        let next = if out_of_rounds || lost_for_good {
            self.game_over = true;
            NextRound::GameOver
        } else {
            NextRound::Play(self.level)
        };
        log::info!(
            "round {} {}, next: {:?}",
            self.rounds_played,
            if won { "won" } else { "lost" },
            next
        );
        self.next_round = Some(next);
    }
}
