//! Preview pacing and the tokens used to schedule it.
//!
//! The core never waits on its own. Every preview action comes back to the caller as a
//! [`ScheduledTick`]: wait `delay` milliseconds, then hand `token` back to
//! [`RoundController::advance_preview`](crate::RoundController::advance_preview).

use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewTiming {
    /// Pause before each step lights up, and before play starts.
    pub lead_in: Millis,
    /// Pulse length at level 0.
    pub base_pulse: Millis,
    /// How much shorter the pulse gets per level.
    pub pulse_decrement: Millis,
    /// Pulses never get shorter than this.
    pub min_pulse: Millis,
}

impl PreviewTiming {
    pub const fn classic() -> Self {
        Self {
            lead_in: 1000,
            base_pulse: 1000,
            pulse_decrement: 100,
            min_pulse: 100,
        }
    }

    /// Length of each half of a step's pulse at `level`.
    pub const fn pulse(&self, level: Level) -> Millis {
        let pulse = self
            .base_pulse
            .saturating_sub(self.pulse_decrement.saturating_mul(level as Millis));
        if pulse < self.min_pulse {
            self.min_pulse
        } else {
            pulse
        }
    }

    /// Time from the start of the preview until play begins.
    pub fn total_duration(&self, sequence: &Sequence) -> u64 {
        let pulses: u64 = sequence
            .iter()
            .map(|step| 2 * u64::from(self.pulse(step.level)))
            .sum();
        let lead_ins = (sequence.len() as u64 + 1) * u64::from(self.lead_in);
        pulses + lead_ins
    }
}

impl Default for PreviewTiming {
    fn default() -> Self {
        Self::classic()
    }
}

/// Where the preview chain stands; the payload is the step position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviewStage {
    /// Light up the step, or start play once past the last step.
    LeadIn(usize),
    /// Light up the step again.
    Hold(usize),
    /// Turn the step off and move on.
    Release(usize),
}

/// Identifies one pending preview action of one round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewToken {
    pub(crate) generation: u32,
    pub(crate) stage: PreviewStage,
}

impl PreviewToken {
    pub fn stage(&self) -> PreviewStage {
        self.stage
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTick {
    pub delay: Millis,
    pub token: PreviewToken,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PreviewAdvance {
    /// Schedule this tick next.
    Continue(ScheduledTick),
    /// The whole sequence was shown and the round is now playing.
    Finished,
}
