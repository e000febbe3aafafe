use serde::{Deserialize, Serialize};

/// Negotiation stage derived from the round counter. Never stored; always
/// recomputed through a [`PhaseSchedule`] so threshold literals live in one
/// place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Opening,
    Moderate,
    Pressure,
    Final,
}

impl RoundPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opening => "opening",
            Self::Moderate => "moderate",
            Self::Pressure => "pressure",
            Self::Final => "final",
        }
    }
}

/// Maps rounds onto phases. Boundaries are fixed for the session lifetime.
///
/// The final phase always wins: any round at or past `max_rounds` is Final
/// regardless of where the opening/moderate boundaries sit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSchedule {
    pub opening_through: u8,
    pub moderate_through: u8,
    pub max_rounds: u8,
}

impl PhaseSchedule {
    pub fn new(opening_through: u8, moderate_through: u8, max_rounds: u8) -> Self {
        Self { opening_through, moderate_through, max_rounds }
    }

    pub fn classify(&self, round: u8) -> RoundPhase {
        if round >= self.max_rounds {
            RoundPhase::Final
        } else if round <= self.opening_through {
            RoundPhase::Opening
        } else if round <= self.moderate_through {
            RoundPhase::Moderate
        } else {
            RoundPhase::Pressure
        }
    }
}

impl Default for PhaseSchedule {
    fn default() -> Self {
        Self { opening_through: 3, moderate_through: 6, max_rounds: 10 }
    }
}
