//! The boundary to the rules engine, plus a bundled stand-in.
//!
//! A real engine plays each card's effects out in full; that lives outside
//! this workspace. [`DemoEngine`] is a coarse statistical model (damage as
//! a function of total deck strength) kept only so the driver and the
//! integration tests can run complete batches.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

use crate::bots::BotId;
use crate::catalog::{CardCatalog, CardKind};
use crate::outcome::{TrialOutcome, Winner};
use crate::spec::{CurrentPlayer, GameStateSpec, Zone};

/// A single playout's unexpected failure. Isolated per trial: the batch
/// runner logs and drops the trial without aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayoutError {
    #[error("playout exceeded {0} hands without a result")]
    HandLimit(u32),
    #[error("playout aborted: {0}")]
    Aborted(String),
}

/// Plays one duel to completion from a described state.
///
/// Implementations must be deterministic in `(spec, seed)`: the batch
/// runner derives an independent seed per trial and relies on nothing
/// else for reproducibility.
pub trait PlayoutEngine {
    /// Play the remainder of the duel.
    ///
    /// # Errors
    ///
    /// Returns a [`PlayoutError`] when the playout cannot reach a result.
    fn play(&self, spec: &GameStateSpec, seed: u64) -> Result<TrialOutcome, PlayoutError>;
}

const ZONES_PLAYER: [Zone; 5] = [
    Zone::Hand,
    Zone::Deck,
    Zone::Discard,
    Zone::BasesInPlay,
    Zone::Gambits,
];

const ZONES_OPPONENT: [Zone; 4] = [
    Zone::OpponentHandAndDeck,
    Zone::OpponentDiscard,
    Zone::OpponentBasesInPlay,
    Zone::OpponentGambits,
];

/// Deck-power playout model.
///
/// Each side's zones are collapsed into a single strength score (card cost
/// as the proxy, bases weighted up, gambits flat) and hands are resolved
/// as seeded damage rolls until one side's authority is gone.
pub struct DemoEngine {
    catalog: CardCatalog,
    hand_limit: u32,
}

impl Default for DemoEngine {
    fn default() -> Self {
        Self::new(CardCatalog::builtin().clone())
    }
}

impl DemoEngine {
    const DEFAULT_HAND_LIMIT: u32 = 400;

    #[must_use]
    pub fn new(catalog: CardCatalog) -> Self {
        Self {
            catalog,
            hand_limit: Self::DEFAULT_HAND_LIMIT,
        }
    }

    #[must_use]
    pub const fn with_hand_limit(mut self, hand_limit: u32) -> Self {
        self.hand_limit = hand_limit;
        self
    }

    fn side_power(&self, spec: &GameStateSpec, zones: &[Zone], shuffles: i32) -> f64 {
        let mut power = 0.0;
        for &zone in zones {
            let (tokens, _) = spec.parse_zone(zone, &self.catalog);
            for token in tokens {
                let count = f64::from(token.count);
                if zone.is_gambit() {
                    power += 1.5 * count;
                    continue;
                }
                if let Some(card) = self.catalog.lookup(&token.name) {
                    let weight = match card.kind {
                        CardKind::Ship => 1.0,
                        CardKind::Base | CardKind::Outpost => 1.2,
                    };
                    power += weight * f64::from(card.cost) * count;
                }
            }
        }
        // A deck that has cycled more often has bought more on average.
        power + f64::from(shuffles.max(0)) * 0.5
    }
}

#[derive(Debug, Clone, Copy)]
struct BotProfile {
    aggression: f64,
    recovery: f64,
    ramp: f64,
}

const fn bot_profile(bot: BotId) -> BotProfile {
    match bot {
        BotId::Velocity => BotProfile {
            aggression: 1.0,
            recovery: 0.0,
            ramp: 0.0,
        },
        BotId::Attack => BotProfile {
            aggression: 1.25,
            recovery: 0.0,
            ramp: 0.0,
        },
        BotId::Defense => BotProfile {
            aggression: 0.85,
            recovery: 0.6,
            ramp: 0.0,
        },
        BotId::EndGame => BotProfile {
            aggression: 0.9,
            recovery: 0.0,
            ramp: 0.025,
        },
        BotId::Scripted => BotProfile {
            aggression: 1.0,
            recovery: 0.0,
            ramp: 0.0,
        },
    }
}

impl PlayoutEngine for DemoEngine {
    fn play(&self, spec: &GameStateSpec, seed: u64) -> Result<TrialOutcome, PlayoutError> {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);

        let player_power = self.side_power(spec, &ZONES_PLAYER, spec.shuffles);
        let opponent_power = self.side_power(spec, &ZONES_OPPONENT, spec.opponent_shuffles);

        let mut player_authority = f64::from(spec.authority);
        let mut opponent_authority = f64::from(spec.opponent_authority);

        let mut player_acts = match spec.current_player {
            CurrentPlayer::Player => true,
            CurrentPlayer::Opponent => false,
            CurrentPlayer::Random => rng.random(),
        };

        let mut player_curve = BTreeMap::new();
        let mut opponent_curve = BTreeMap::new();

        for hand in 0..self.hand_limit {
            let turn = spec.turn.saturating_add(hand);
            let (bot, power) = if player_acts {
                (spec.bot, player_power)
            } else {
                (spec.opponent_bot, opponent_power)
            };
            let profile = bot_profile(bot);

            let jitter = if bot.is_scripted() {
                0.0
            } else {
                rng.random_range(0.0..4.0)
            };
            let ramp = 1.0 + profile.ramp * f64::from(hand);
            let damage = (2.0 + power / 6.0) * profile.aggression * ramp + jitter;

            if player_acts {
                opponent_authority -= damage;
                player_authority += profile.recovery;
            } else {
                player_authority -= damage;
                opponent_authority += profile.recovery;
            }

            player_curve.insert(turn, snapshot(player_authority));
            opponent_curve.insert(turn, snapshot(opponent_authority));

            let winner = if opponent_authority <= 0.0 {
                Some(Winner::Player)
            } else if player_authority <= 0.0 {
                Some(Winner::Opponent)
            } else {
                None
            };

            if let Some(winner) = winner {
                return Ok(TrialOutcome {
                    winner,
                    player_authority_by_turn: player_curve,
                    opponent_authority_by_turn: opponent_curve,
                    bot: spec.bot,
                    opponent_bot: spec.opponent_bot,
                });
            }

            player_acts = !player_acts;
        }

        Err(PlayoutError::HandLimit(self.hand_limit))
    }
}

// Truncation toward zero keeps a side that is barely alive above 0.
#[allow(clippy::cast_possible_truncation)]
fn snapshot(authority: f64) -> i32 {
    authority.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}
