use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bots::BotId;

/// Who won a single playout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Player,
    Opponent,
    Draw,
}

/// Result of one complete playout.
///
/// Authority snapshots are keyed by turn number and ordered, so the
/// aggregate curve can walk turns in ascending order without sorting.
/// Outcomes are owned transiently by the batch runner and consumed by the
/// active aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub winner: Winner,
    pub player_authority_by_turn: BTreeMap<u32, i32>,
    pub opponent_authority_by_turn: BTreeMap<u32, i32>,
    pub bot: BotId,
    pub opponent_bot: BotId,
}

impl TrialOutcome {
    /// A bare outcome with no authority history, useful as a stub result.
    #[must_use]
    pub fn decided(winner: Winner, bot: BotId, opponent_bot: BotId) -> Self {
        Self {
            winner,
            player_authority_by_turn: BTreeMap::new(),
            opponent_authority_by_turn: BTreeMap::new(),
            bot,
            opponent_bot,
        }
    }
}
