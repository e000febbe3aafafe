use rust_decimal::Decimal;

use crate::engine::phase::RoundPhase;

pub trait ConcessionEngine: Send + Sync {
    fn concession_rate(&self, phase: RoundPhase) -> Decimal;
}

/// Step-function concession schedule: a fixed rate per phase, monotonically
/// non-decreasing as rounds progress. The Final phase is closed out by the
/// acceptance evaluator, so it reports the pressure rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SteppedLadder {
    opening_rate: Decimal,
    moderate_rate: Decimal,
    pressure_rate: Decimal,
}

impl SteppedLadder {
    pub fn new(opening_rate: Decimal, moderate_rate: Decimal, pressure_rate: Decimal) -> Self {
        Self { opening_rate, moderate_rate, pressure_rate }
    }
}

impl Default for SteppedLadder {
    fn default() -> Self {
        Self {
            opening_rate: Decimal::new(5, 2),
            moderate_rate: Decimal::new(10, 2),
            pressure_rate: Decimal::new(15, 2),
        }
    }
}

impl ConcessionEngine for SteppedLadder {
    fn concession_rate(&self, phase: RoundPhase) -> Decimal {
        match phase {
            RoundPhase::Opening => self.opening_rate,
            RoundPhase::Moderate => self.moderate_rate,
            RoundPhase::Pressure | RoundPhase::Final => self.pressure_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{ConcessionEngine, SteppedLadder};
    use crate::engine::phase::RoundPhase;

    #[test]
    fn default_ladder_steps_up_by_phase() {
        let ladder = SteppedLadder::default();

        assert_eq!(ladder.concession_rate(RoundPhase::Opening), Decimal::new(5, 2));
        assert_eq!(ladder.concession_rate(RoundPhase::Moderate), Decimal::new(10, 2));
        assert_eq!(ladder.concession_rate(RoundPhase::Pressure), Decimal::new(15, 2));
    }

    #[test]
    fn rates_never_decrease_across_phases() {
        let ladder = SteppedLadder::default();
        let phases =
            [RoundPhase::Opening, RoundPhase::Moderate, RoundPhase::Pressure, RoundPhase::Final];

        let rates: Vec<_> = phases.iter().map(|phase| ladder.concession_rate(*phase)).collect();
        assert!(rates.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}
