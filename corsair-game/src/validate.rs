//! Whole-state validation.
//!
//! One validator, parameterized by the simulation mode plus a small
//! per-mode limits table, replaces the three near-identical rule sets the
//! historical versions of this check accumulated. Every rule is evaluated
//! independently: the operator sees the complete list of problems, and an
//! empty list is the only signal that lets a batch launch.

use serde::{Deserialize, Serialize};

use crate::bots::BotId;
use crate::catalog::CardCatalog;
use crate::spec::{CurrentPlayer, GameStateSpec, ValidationError, Zone};

/// Which aggregate the batch will produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimulationMode {
    Standard,
    BuyImpact,
    BotComparison,
}

impl SimulationMode {
    /// Trial count used when the caller does not pick one.
    #[must_use]
    pub const fn default_trials(self) -> u32 {
        match self {
            Self::Standard => 2000,
            Self::BuyImpact | Self::BotComparison => 500,
        }
    }

    #[must_use]
    pub const fn limits(self) -> TrialLimits {
        match self {
            Self::Standard => TrialLimits {
                min_trials: 10,
                max_trials: 20_000,
                scripted_bot_allowed: true,
                scripted_bot_trial_cap: Some(100),
                random_current_player_allowed: true,
            },
            Self::BuyImpact => TrialLimits {
                min_trials: 10,
                max_trials: 2000,
                scripted_bot_allowed: false,
                scripted_bot_trial_cap: None,
                random_current_player_allowed: false,
            },
            Self::BotComparison => TrialLimits {
                min_trials: 10,
                max_trials: 20_000,
                scripted_bot_allowed: false,
                scripted_bot_trial_cap: None,
                random_current_player_allowed: true,
            },
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::BuyImpact => "buy impact",
            Self::BotComparison => "bot comparison",
        }
    }
}

/// Numeric guard rails that differ between modes.
///
/// The scripted bot's playouts are an order of magnitude slower, so the
/// standard mode caps its trial count; the sweep modes exclude it outright
/// because it cannot be substituted mid-sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialLimits {
    pub min_trials: u32,
    pub max_trials: u32,
    pub scripted_bot_allowed: bool,
    pub scripted_bot_trial_cap: Option<u32>,
    pub random_current_player_allowed: bool,
}

const TURN_RANGE: std::ops::RangeInclusive<u32> = 1..=100;
const AUTHORITY_MAX: i32 = 500;
const SHUFFLE_RANGE: std::ops::RangeInclusive<i32> = 0..=50;

/// Validate a described state for a given mode and trial count.
///
/// Pure and idempotent: the same inputs always produce the same error
/// list, and nothing is mutated. Rules never short-circuit each other.
#[must_use]
pub fn validate(
    spec: &GameStateSpec,
    mode: SimulationMode,
    trials: u32,
    catalog: &CardCatalog,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if spec.include_base_set == spec.include_expansion {
        errors.push(ValidationError::new(
            "sets",
            "You must include exactly one of the base set and the expansion",
        ));
    }

    if !TURN_RANGE.contains(&spec.turn) {
        errors.push(ValidationError::new(
            "turn",
            format!("Invalid turn: {}", spec.turn),
        ));
    }

    if spec.authority <= 0 || spec.authority > AUTHORITY_MAX {
        errors.push(ValidationError::new(
            "authority",
            format!("Invalid authority: {}", spec.authority),
        ));
    }

    if spec.opponent_authority <= 0 || spec.opponent_authority > AUTHORITY_MAX {
        errors.push(ValidationError::new(
            "opponent authority",
            format!("Invalid opponent authority: {}", spec.opponent_authority),
        ));
    }

    if !SHUFFLE_RANGE.contains(&spec.shuffles) {
        errors.push(ValidationError::new(
            "shuffles",
            format!("Invalid shuffles: {}", spec.shuffles),
        ));
    }

    if !SHUFFLE_RANGE.contains(&spec.opponent_shuffles) {
        errors.push(ValidationError::new(
            "opponent shuffles",
            format!("Invalid opponent shuffles: {}", spec.opponent_shuffles),
        ));
    }

    let limits = mode.limits();

    if !(limits.min_trials..=limits.max_trials).contains(&trials) {
        errors.push(ValidationError::new(
            "trials",
            format!("Invalid number of trials to simulate: {trials}"),
        ));
    }

    if !limits.random_current_player_allowed && spec.current_player == CurrentPlayer::Random {
        errors.push(ValidationError::new(
            "current player",
            format!("The current player cannot be random when simulating {}", mode.label()),
        ));
    }

    if spec.bot.is_scripted() {
        if !limits.scripted_bot_allowed {
            errors.push(ValidationError::new(
                "bot",
                format!(
                    "{} cannot be used when simulating {}",
                    BotId::Scripted,
                    mode.label()
                ),
            ));
        } else if let Some(cap) = limits.scripted_bot_trial_cap
            && trials > cap
        {
            errors.push(ValidationError::new(
                "trials",
                format!(
                    "Trials cannot exceed {cap} when using {}",
                    BotId::Scripted
                ),
            ));
        }
    }

    for zone in Zone::ALL {
        let (_, mut zone_errors) = spec.parse_zone(zone, catalog);
        errors.append(&mut zone_errors);
    }

    errors
}
