//! Batch orchestration: the validation gate, the parallel trial fan-out,
//! and the three mode drivers.

use rayon::prelude::*;
use thiserror::Error;

use corsair_game::{
    BotId, CardCatalog, GameStateSpec, PlayoutEngine, SimulationMode, TrialOutcome,
    ValidationError, Zone, validate,
};

use crate::aggregate::{
    AuthorityCurveAggregator, BotComparisonAggregator, BuyImpactAggregator, SimulationReport,
    WinRateTally,
};

/// Spreads candidate sub-batches across the seed space so they never
/// share trial seeds with the baseline or with each other.
const SUB_BATCH_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Everything a batch needs besides the state itself.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub mode: SimulationMode,
    pub trials: u32,
    pub seed: u64,
    /// Candidate card names for buy-impact mode. Callers decide legality;
    /// [`trade_row_candidates`] derives the usual list.
    pub buy_candidates: Vec<String>,
    /// Candidate bots for bot-comparison mode; empty means the default
    /// non-scripted roster.
    pub bot_candidates: Vec<BotId>,
}

impl BatchConfig {
    #[must_use]
    pub fn new(mode: SimulationMode, trials: u32, seed: u64) -> Self {
        Self {
            mode,
            trials,
            seed,
            buy_candidates: Vec::new(),
            bot_candidates: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_buy_candidates(mut self, candidates: Vec<String>) -> Self {
        self.buy_candidates = candidates;
        self
    }

    #[must_use]
    pub fn with_bot_candidates(mut self, candidates: Vec<BotId>) -> Self {
        self.bot_candidates = candidates;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulateError {
    #[error("game state failed validation with {} error(s)", .0.len())]
    Invalid(Vec<ValidationError>),
}

/// Validate and, if clean, run the batch for the configured mode.
///
/// Validation gates everything: no trial launches while any error exists,
/// and the full error list is returned to the caller. Blocks until every
/// trial (and sub-batch) has completed.
///
/// # Errors
///
/// Returns [`SimulateError::Invalid`] with the complete error list when
/// the described state does not validate.
pub fn simulate<E>(
    spec: &GameStateSpec,
    config: &BatchConfig,
    catalog: &CardCatalog,
    engine: &E,
) -> Result<SimulationReport, SimulateError>
where
    E: PlayoutEngine + Sync,
{
    let errors = validate(spec, config.mode, config.trials, catalog);
    if !errors.is_empty() {
        return Err(SimulateError::Invalid(errors));
    }

    let report = match config.mode {
        SimulationMode::Standard => run_authority(spec, config, engine),
        SimulationMode::BuyImpact => run_buy_impact(spec, config, engine),
        SimulationMode::BotComparison => run_bot_comparison(spec, config, engine),
    };
    Ok(report)
}

/// The distinct cards an operator could buy from the described trade row,
/// plus the always-available explorer pile.
#[must_use]
pub fn trade_row_candidates(spec: &GameStateSpec, catalog: &CardCatalog) -> Vec<String> {
    let (tokens, _) = spec.parse_zone(Zone::TradeRow, catalog);
    let mut names: Vec<String> = Vec::new();
    for token in tokens {
        if token.count > 0 && !names.contains(&token.name) {
            names.push(token.name);
        }
    }
    if let Some(card) = catalog.lookup("Explorer")
        && !names.contains(&card.name)
    {
        names.push(card.name.clone());
    }
    names
}

/// Run `trials` independent playouts and collect the usable outcomes.
///
/// Trials share the state read-only and own nothing else in common, so the
/// map is embarrassingly parallel; the fold into an aggregator happens
/// sequentially afterwards. A faulted trial is logged and dropped: it
/// never reaches a denominator and is not retried.
fn run_trials<E>(spec: &GameStateSpec, trials: u32, master_seed: u64, engine: &E) -> Vec<TrialOutcome>
where
    E: PlayoutEngine + Sync,
{
    (0..trials)
        .into_par_iter()
        .filter_map(|index| {
            let trial_seed = master_seed.wrapping_add(u64::from(index));
            match engine.play(spec, trial_seed) {
                Ok(outcome) => Some(outcome),
                Err(err) => {
                    log::warn!("dropping faulted trial {index} (seed {trial_seed}): {err}");
                    None
                }
            }
        })
        .collect()
}

fn run_authority<E>(spec: &GameStateSpec, config: &BatchConfig, engine: &E) -> SimulationReport
where
    E: PlayoutEngine + Sync,
{
    let outcomes = run_trials(spec, config.trials, config.seed, engine);
    let mut aggregator = AuthorityCurveAggregator::default();
    for outcome in &outcomes {
        aggregator.ingest(outcome);
    }
    SimulationReport::Authority(aggregator.finish())
}

fn win_rate_for<E>(spec: &GameStateSpec, trials: u32, master_seed: u64, engine: &E) -> WinRateTally
where
    E: PlayoutEngine + Sync,
{
    let mut tally = WinRateTally::default();
    for outcome in run_trials(spec, trials, master_seed, engine) {
        tally.ingest(&outcome);
    }
    tally
}

fn sub_batch_seed(master_seed: u64, candidate_index: usize) -> u64 {
    let index = u64::try_from(candidate_index).unwrap_or(u64::MAX);
    master_seed.wrapping_add(index.wrapping_add(1).wrapping_mul(SUB_BATCH_STRIDE))
}

fn run_buy_impact<E>(spec: &GameStateSpec, config: &BatchConfig, engine: &E) -> SimulationReport
where
    E: PlayoutEngine + Sync,
{
    let baseline = win_rate_for(spec, config.trials, config.seed, engine);

    let rates: Vec<(String, WinRateTally)> = config
        .buy_candidates
        .par_iter()
        .enumerate()
        .map(|(index, card)| {
            let modified = with_card_in_discard(spec, card);
            let seed = sub_batch_seed(config.seed, index);
            (card.clone(), win_rate_for(&modified, config.trials, seed, engine))
        })
        .collect();

    let mut aggregator = BuyImpactAggregator::new(baseline.rate());
    for (card, tally) in rates {
        aggregator.record_candidate(card, tally.rate());
    }
    SimulationReport::BuyImpact(aggregator.finish())
}

fn run_bot_comparison<E>(spec: &GameStateSpec, config: &BatchConfig, engine: &E) -> SimulationReport
where
    E: PlayoutEngine + Sync,
{
    let candidates = if config.bot_candidates.is_empty() {
        BotId::comparison_candidates()
    } else {
        config.bot_candidates.clone()
    };

    let rates: Vec<(BotId, WinRateTally)> = candidates
        .into_par_iter()
        .enumerate()
        .map(|(index, bot)| {
            let mut modified = spec.clone();
            modified.bot = bot;
            let seed = sub_batch_seed(config.seed, index);
            (bot, win_rate_for(&modified, config.trials, seed, engine))
        })
        .collect();

    let mut aggregator = BotComparisonAggregator::default();
    for (bot, tally) in &rates {
        aggregator.record_bot(*bot, tally);
    }
    SimulationReport::BotComparison(aggregator.finish())
}

/// A hypothetical purchase lands in the current player's discard pile,
/// exactly where a real buy would put it.
fn with_card_in_discard(spec: &GameStateSpec, card: &str) -> GameStateSpec {
    let mut modified = spec.clone();
    if modified.discard.trim().is_empty() {
        modified.discard = card.to_string();
    } else {
        modified.discard = format!("{}, {card}", modified.discard);
    }
    modified
}

#[cfg(test)]
mod tests {
    use super::*;
    use corsair_game::{CurrentPlayer, PlayoutError, TrialOutcome, Winner};

    /// Deterministic stub: wins whenever `seed % 10` is below the
    /// threshold, so a consecutive seed range yields an exact proportion.
    struct FixedPatternEngine {
        wins_per_ten: u64,
    }

    impl PlayoutEngine for FixedPatternEngine {
        fn play(&self, spec: &GameStateSpec, seed: u64) -> Result<TrialOutcome, PlayoutError> {
            let winner = if seed % 10 < self.wins_per_ten {
                Winner::Player
            } else {
                Winner::Opponent
            };
            Ok(TrialOutcome::decided(winner, spec.bot, spec.opponent_bot))
        }
    }

    /// Faults on every fifth seed, wins on the rest.
    struct FlakyEngine;

    impl PlayoutEngine for FlakyEngine {
        fn play(&self, spec: &GameStateSpec, seed: u64) -> Result<TrialOutcome, PlayoutError> {
            if seed % 5 == 0 {
                return Err(PlayoutError::Aborted("stub fault".to_string()));
            }
            Ok(TrialOutcome::decided(
                Winner::Player,
                spec.bot,
                spec.opponent_bot,
            ))
        }
    }

    fn valid_spec() -> GameStateSpec {
        GameStateSpec {
            turn: 5,
            trade_row: "Cutter, Battle Blob, Cutter".to_string(),
            ..GameStateSpec::default()
        }
    }

    #[test]
    fn validation_gates_the_batch() {
        let spec = GameStateSpec {
            authority: 0,
            turn: 0,
            ..valid_spec()
        };
        let config = BatchConfig::new(SimulationMode::Standard, 1000, 0);
        let engine = FixedPatternEngine { wins_per_ten: 5 };
        let err = simulate(&spec, &config, CardCatalog::builtin(), &engine).unwrap_err();
        let SimulateError::Invalid(errors) = err;
        assert!(errors.len() >= 2, "expected the full list, got {errors:?}");
    }

    #[test]
    fn win_rate_matches_a_known_proportion() {
        let config = BatchConfig::new(SimulationMode::Standard, 1000, 0);
        let engine = FixedPatternEngine { wins_per_ten: 7 };
        let report = simulate(&valid_spec(), &config, CardCatalog::builtin(), &engine).unwrap();
        let SimulationReport::Authority(curve) = report else {
            panic!("expected authority report");
        };
        assert_eq!(curve.trials, 1000);
        assert!(
            (curve.win_rate - 0.7).abs() < 0.05,
            "win rate {} too far from 0.7",
            curve.win_rate
        );
    }

    #[test]
    fn faulted_trials_leave_the_denominator() {
        let config = BatchConfig::new(SimulationMode::Standard, 1000, 0);
        let report = simulate(&valid_spec(), &config, CardCatalog::builtin(), &FlakyEngine).unwrap();
        let SimulationReport::Authority(curve) = report else {
            panic!("expected authority report");
        };
        assert_eq!(curve.trials, 800);
        assert!((curve.win_rate - 1.0).abs() < 1e-9);
    }

    #[test]
    fn buy_impact_reports_one_row_per_candidate() {
        let spec = GameStateSpec {
            current_player: CurrentPlayer::Player,
            ..valid_spec()
        };
        let candidates = trade_row_candidates(&spec, CardCatalog::builtin());
        assert_eq!(candidates, vec!["Cutter", "Battle Blob", "Explorer"]);

        let config = BatchConfig::new(SimulationMode::BuyImpact, 100, 0)
            .with_buy_candidates(candidates.clone());
        let engine = FixedPatternEngine { wins_per_ten: 5 };
        let report = simulate(&spec, &config, CardCatalog::builtin(), &engine).unwrap();
        let SimulationReport::BuyImpact(impact) = report else {
            panic!("expected buy-impact report");
        };
        assert_eq!(impact.candidates.len(), candidates.len());
    }

    #[test]
    fn bot_comparison_defaults_to_the_non_scripted_roster() {
        let config = BatchConfig::new(SimulationMode::BotComparison, 100, 0);
        let engine = FixedPatternEngine { wins_per_ten: 5 };
        let report = simulate(&valid_spec(), &config, CardCatalog::builtin(), &engine).unwrap();
        let SimulationReport::BotComparison(comparison) = report else {
            panic!("expected bot-comparison report");
        };
        assert_eq!(comparison.bots.len(), 4);
        assert!(comparison.bots.iter().all(|row| !row.bot.is_scripted()));
        assert!(comparison.bots.iter().all(|row| row.trials == 100));
    }

    #[test]
    fn hypothetical_buys_append_to_the_discard() {
        let spec = valid_spec();
        let modified = with_card_in_discard(&spec, "Cutter");
        assert_eq!(modified.discard, "Cutter");
        let again = with_card_in_discard(&modified, "Battle Blob");
        assert_eq!(again.discard, "Cutter, Battle Blob");
    }

    #[test]
    fn sub_batches_use_disjoint_seed_ranges() {
        let base = sub_batch_seed(1337, 0);
        let next = sub_batch_seed(1337, 1);
        assert_ne!(base, next);
        assert!(next.wrapping_sub(base) > u64::from(u32::MAX));
    }
}
