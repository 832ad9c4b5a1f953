//! Folding trial outcomes into the three report shapes.
//!
//! All aggregation here is commutative and associative over the trial
//! set: the batch runner may hand outcomes over in any order and the
//! finished report is the same, up to float summation order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use corsair_game::{BotId, TrialOutcome, Winner};

/// Average authority for one player at one turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnAverage {
    pub turn: u32,
    pub authority: f64,
}

/// Per-turn running totals for one player's authority across trials.
#[derive(Debug, Clone, Default)]
struct TurnTotals {
    by_turn: BTreeMap<u32, (i64, u32)>,
}

impl TurnTotals {
    fn record(&mut self, turn: u32, authority: i32) {
        let entry = self.by_turn.entry(turn).or_insert((0, 0));
        entry.0 += i64::from(authority);
        entry.1 += 1;
    }

    /// Average series in ascending turn order, ending after the second
    /// turn whose average is <= 0. Past a double knockout the series is
    /// noise from the few trials that ran long, and charts built from it
    /// would stretch to cover dead space.
    fn truncated_averages(&self) -> Vec<TurnAverage> {
        let mut series = Vec::with_capacity(self.by_turn.len());
        let mut zeros_found = 0;
        for (&turn, &(sum, count)) in &self.by_turn {
            if count == 0 {
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            let authority = sum as f64 / f64::from(count);
            series.push(TurnAverage { turn, authority });
            if authority <= 0.0 {
                zeros_found += 1;
                if zeros_found >= 2 {
                    break;
                }
            }
        }
        series
    }
}

/// Wins over counted trials. Faulted trials never reach a tally, so they
/// are absent from the denominator by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WinRateTally {
    wins: u32,
    trials: u32,
}

impl WinRateTally {
    pub fn ingest(&mut self, outcome: &TrialOutcome) {
        self.trials += 1;
        if outcome.winner == Winner::Player {
            self.wins += 1;
        }
    }

    #[must_use]
    pub const fn trials(&self) -> u32 {
        self.trials
    }

    #[must_use]
    pub fn rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.trials)
        }
    }
}

/// Builds the average-authority-per-turn curve for both players.
#[derive(Debug, Clone, Default)]
pub struct AuthorityCurveAggregator {
    player: TurnTotals,
    opponent: TurnTotals,
    tally: WinRateTally,
}

impl AuthorityCurveAggregator {
    pub fn ingest(&mut self, outcome: &TrialOutcome) {
        self.tally.ingest(outcome);
        for (&turn, &authority) in &outcome.player_authority_by_turn {
            self.player.record(turn, authority);
        }
        for (&turn, &authority) in &outcome.opponent_authority_by_turn {
            self.opponent.record(turn, authority);
        }
    }

    #[must_use]
    pub fn finish(self) -> AuthorityCurve {
        AuthorityCurve {
            player_series: self.player.truncated_averages(),
            opponent_series: self.opponent.truncated_averages(),
            win_rate: self.tally.rate(),
            trials: self.tally.trials(),
        }
    }
}

/// Authority-over-time report: the curve is truncated independently per
/// player (see [`AuthorityCurveAggregator`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorityCurve {
    pub player_series: Vec<TurnAverage>,
    pub opponent_series: Vec<TurnAverage>,
    pub win_rate: f64,
    pub trials: u32,
}

/// One candidate row of the buy-impact report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyImpactRow {
    pub card: String,
    pub win_rate: f64,
    pub delta: f64,
}

/// Collects per-candidate win rates against a baseline.
#[derive(Debug, Clone)]
pub struct BuyImpactAggregator {
    baseline_win_rate: f64,
    rows: Vec<BuyImpactRow>,
}

impl BuyImpactAggregator {
    #[must_use]
    pub const fn new(baseline_win_rate: f64) -> Self {
        Self {
            baseline_win_rate,
            rows: Vec::new(),
        }
    }

    pub fn record_candidate(&mut self, card: impl Into<String>, win_rate: f64) {
        let card = card.into();
        self.rows.push(BuyImpactRow {
            card,
            win_rate,
            delta: win_rate - self.baseline_win_rate,
        });
    }

    /// Rows sorted best-first; equal deltas fall back to name order so
    /// the report is deterministic.
    #[must_use]
    pub fn finish(mut self) -> BuyImpactReport {
        self.rows.sort_by(|a, b| {
            b.delta
                .total_cmp(&a.delta)
                .then_with(|| a.card.cmp(&b.card))
        });
        BuyImpactReport {
            baseline_win_rate: self.baseline_win_rate,
            candidates: self.rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyImpactReport {
    pub baseline_win_rate: f64,
    pub candidates: Vec<BuyImpactRow>,
}

/// One bot's aggregate result in the comparison sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotWinRate {
    pub bot: BotId,
    pub win_rate: f64,
    pub trials: u32,
}

/// Collects raw win rates per candidate bot. No baseline subtraction:
/// rows are compared directly against each other.
#[derive(Debug, Clone, Default)]
pub struct BotComparisonAggregator {
    rows: Vec<BotWinRate>,
}

impl BotComparisonAggregator {
    pub fn record_bot(&mut self, bot: BotId, tally: &WinRateTally) {
        self.rows.push(BotWinRate {
            bot,
            win_rate: tally.rate(),
            trials: tally.trials(),
        });
    }

    /// Rows sorted best-first; ties fall back to label order.
    #[must_use]
    pub fn finish(mut self) -> BotComparisonReport {
        self.rows.sort_by(|a, b| {
            b.win_rate
                .total_cmp(&a.win_rate)
                .then_with(|| a.bot.label().cmp(b.bot.label()))
        });
        BotComparisonReport { bots: self.rows }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotComparisonReport {
    pub bots: Vec<BotWinRate>,
}

/// The one report a batch produces, shaped by the requested mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum SimulationReport {
    Authority(AuthorityCurve),
    BuyImpact(BuyImpactReport),
    BotComparison(BotComparisonReport),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    const EPSILON: f64 = 1e-9;

    fn outcome_with_curve(winner: Winner, player_curve: &[(u32, i32)]) -> TrialOutcome {
        TrialOutcome {
            winner,
            player_authority_by_turn: player_curve.iter().copied().collect(),
            opponent_authority_by_turn: BTreeMap::new(),
            bot: BotId::Velocity,
            opponent_bot: BotId::Velocity,
        }
    }

    #[test]
    fn curve_truncates_after_second_nonpositive_turn() {
        let mut agg = AuthorityCurveAggregator::default();
        agg.ingest(&outcome_with_curve(
            Winner::Player,
            &[(1, 10), (2, 5), (3, 0), (4, 0), (5, 3)],
        ));
        let curve = agg.finish();
        let turns: Vec<u32> = curve.player_series.iter().map(|p| p.turn).collect();
        assert_eq!(turns, vec![1, 2, 3, 4]);
    }

    #[test]
    fn curve_keeps_a_recovery_between_the_two_zeros() {
        let mut agg = AuthorityCurveAggregator::default();
        agg.ingest(&outcome_with_curve(
            Winner::Player,
            &[(1, 10), (2, 0), (3, 4), (4, -2), (5, 6)],
        ));
        let curve = agg.finish();
        let turns: Vec<u32> = curve.player_series.iter().map(|p| p.turn).collect();
        assert_eq!(turns, vec![1, 2, 3, 4]);
    }

    #[test]
    fn curve_averages_across_trials() {
        let mut agg = AuthorityCurveAggregator::default();
        agg.ingest(&outcome_with_curve(Winner::Player, &[(1, 40)]));
        agg.ingest(&outcome_with_curve(Winner::Opponent, &[(1, 20)]));
        let curve = agg.finish();
        assert!((curve.player_series[0].authority - 30.0).abs() < EPSILON);
        assert!((curve.win_rate - 0.5).abs() < EPSILON);
        assert_eq!(curve.trials, 2);
    }

    #[test]
    fn truncation_is_independent_per_player() {
        let mut agg = AuthorityCurveAggregator::default();
        let mut outcome = outcome_with_curve(Winner::Player, &[(1, 10), (2, 0), (3, 0), (4, 9)]);
        outcome.opponent_authority_by_turn = [(1, 10), (2, 10), (3, 10), (4, 10)]
            .into_iter()
            .collect();
        agg.ingest(&outcome);
        let curve = agg.finish();
        assert_eq!(curve.player_series.len(), 3);
        assert_eq!(curve.opponent_series.len(), 4);
    }

    #[test]
    fn win_rate_of_an_empty_tally_is_zero() {
        let tally = WinRateTally::default();
        assert!((tally.rate() - 0.0).abs() < EPSILON);
    }

    #[test]
    fn draws_count_toward_the_denominator_only() {
        let mut tally = WinRateTally::default();
        tally.ingest(&outcome_with_curve(Winner::Player, &[]));
        tally.ingest(&outcome_with_curve(Winner::Draw, &[]));
        assert!((tally.rate() - 0.5).abs() < EPSILON);
    }

    #[test]
    fn buy_impact_sorts_by_delta_then_name() {
        let mut agg = BuyImpactAggregator::new(0.5);
        agg.record_candidate("Cutter", 0.6);
        agg.record_candidate("Battle Blob", 0.6);
        agg.record_candidate("Viper", 0.4);
        let report = agg.finish();
        let names: Vec<&str> = report.candidates.iter().map(|r| r.card.as_str()).collect();
        assert_eq!(names, vec!["Battle Blob", "Cutter", "Viper"]);
        assert!((report.candidates[0].delta - 0.1).abs() < EPSILON);
        assert!((report.candidates[2].delta + 0.1).abs() < EPSILON);
    }

    #[test]
    fn bot_comparison_sorts_best_first() {
        let mut winning = WinRateTally::default();
        winning.ingest(&outcome_with_curve(Winner::Player, &[]));
        let mut losing = WinRateTally::default();
        losing.ingest(&outcome_with_curve(Winner::Opponent, &[]));

        let mut agg = BotComparisonAggregator::default();
        agg.record_bot(BotId::Velocity, &losing);
        agg.record_bot(BotId::Attack, &winning);
        let report = agg.finish();
        assert_eq!(report.bots[0].bot, BotId::Attack);
        assert_eq!(report.bots[1].bot, BotId::Velocity);
    }

    #[test]
    fn report_serializes_with_a_mode_tag() {
        let report = SimulationReport::BotComparison(BotComparisonReport { bots: Vec::new() });
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""mode":"bot-comparison""#));
    }
}
