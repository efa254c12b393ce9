//! Round engine for a sequence memory game on a 3×3 board.
//!
//! A round shows a random sequence of cells, then asks the player to select them back in
//! order. [`RoundController`] owns the board and the round state, [`Scoreboard`] keeps the
//! metrics and decides how the game goes on.

#![no_std]

extern crate alloc;

pub use board::*;
pub use controller::*;
pub use error::*;
pub use generator::*;
pub use scoring::*;
pub use sequence::*;
pub use timing::*;
pub use types::*;

mod board;
mod controller;
mod error;
mod generator;
mod scoring;
mod sequence;
mod timing;
mod types;

#[cfg(test)]
mod tests {
    use super::*;

    /// Plays a whole game the way the web runtime does: start, wait out the preview,
    /// answer, and follow the scoreboard until it calls the game.
    #[test]
    fn scripted_game_runs_until_max_rounds() {
        let generator = ScriptedSequenceGenerator::new([
            alloc::vec![0, 1],
            alloc::vec![2, 3, 4],
            alloc::vec![5, 6, 7],
        ])
        .unwrap();
        let mut controller = RoundController::new(generator, PreviewTiming::classic());
        let mut scoreboard = Scoreboard::new(ScoringConfig::new(1, 3, LossPolicy::RetryLevel));

        let mut level = scoreboard.level();
        let mut answers = [true, false, true].into_iter();
        loop {
            let mut tick = controller.start(level).unwrap();
            while let PreviewAdvance::Continue(next) =
                controller.advance_preview(tick.token).unwrap()
            {
                tick = next;
            }

            let answer_right = answers.next().unwrap();
            let targets: alloc::vec::Vec<_> = controller.sequence().unwrap().indices().collect();
            for (i, target) in targets.into_iter().enumerate() {
                let pick = if answer_right {
                    target
                } else {
                    CellIndex::new((target.get() + 1) % CELL_COUNT).unwrap()
                };
                let outcome = controller
                    .select(pick, (i * 100) as f64, &mut scoreboard)
                    .unwrap();
                if outcome.ends_round() {
                    break;
                }
            }

            match scoreboard.take_next_round() {
                Some(NextRound::Play(next)) => level = next,
                Some(NextRound::GameOver) => break,
                None => panic!("round ended without a decision"),
            }
        }
        controller.dispose();

        assert_eq!(scoreboard.rounds_played(), 3);
        assert_eq!(scoreboard.rounds_won(), 2);
        assert_eq!(scoreboard.level(), 3);
        assert_eq!(
            scoreboard
                .metrics()
                .iter()
                .filter(|metric| matches!(metric, Metric::RoundTotal { .. }))
                .count(),
            3
        );
        assert!(controller.board().is_none());
    }
}
