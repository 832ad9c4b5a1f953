//! Rendering a [`SimulationReport`] for humans and machines.

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use crate::aggregate::{
    AuthorityCurve, BotComparisonReport, BuyImpactReport, SimulationReport, TurnAverage,
};

pub fn generate_console_report(
    out: &mut dyn Write,
    report: &SimulationReport,
    duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Simulation Results".bright_cyan().bold())?;
    writeln!(out, "{}", "=====================".cyan())?;

    match report {
        SimulationReport::Authority(curve) => console_authority(out, curve)?,
        SimulationReport::BuyImpact(impact) => console_buy_impact(out, impact)?,
        SimulationReport::BotComparison(comparison) => console_bot_comparison(out, comparison)?,
    }

    writeln!(out)?;
    writeln!(out, "🏁 Total time: {duration:?}")?;
    Ok(())
}

fn console_authority(out: &mut dyn Write, curve: &AuthorityCurve) -> Result<()> {
    writeln!(out, "Trials counted: {}", curve.trials)?;
    writeln!(
        out,
        "Win rate: {}",
        format!("{:.1}%", curve.win_rate * 100.0).green().bold()
    )?;
    writeln!(out)?;
    writeln!(out, "Average authority by turn:")?;
    writeln!(out, "{:>6} {:>10} {:>10}", "Turn", "Player", "Opponent")?;
    for (turn, (player, opponent)) in merge_series(&curve.player_series, &curve.opponent_series) {
        writeln!(
            out,
            "{turn:>6} {:>10} {:>10}",
            format_avg(player),
            format_avg(opponent)
        )?;
    }
    Ok(())
}

fn console_buy_impact(out: &mut dyn Write, impact: &BuyImpactReport) -> Result<()> {
    writeln!(
        out,
        "Baseline win rate: {:.1}%",
        impact.baseline_win_rate * 100.0
    )?;
    writeln!(out)?;
    for row in &impact.candidates {
        let delta = format!("{:+.1}%", row.delta * 100.0);
        let delta = if row.delta > 0.0 {
            delta.green()
        } else if row.delta < 0.0 {
            delta.red()
        } else {
            delta.normal()
        };
        writeln!(
            out,
            "{:<24} {:>6.1}%  {}",
            row.card,
            row.win_rate * 100.0,
            delta
        )?;
    }
    Ok(())
}

fn console_bot_comparison(out: &mut dyn Write, comparison: &BotComparisonReport) -> Result<()> {
    for (rank, row) in comparison.bots.iter().enumerate() {
        let padded = format!("{:<20}", row.bot.label());
        let label = if rank == 0 {
            padded.as_str().bold()
        } else {
            padded.as_str().normal()
        };
        writeln!(
            out,
            "{label} {:>6.1}%  ({} trials)",
            row.win_rate * 100.0,
            row.trials
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, report: &SimulationReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, report: &SimulationReport) -> Result<()> {
    writeln!(out, "# Simulation Results\n")?;

    match report {
        SimulationReport::Authority(curve) => {
            writeln!(out, "- **Trials counted**: {}", curve.trials)?;
            writeln!(out, "- **Win rate**: {:.1}%\n", curve.win_rate * 100.0)?;
            writeln!(out, "| Turn | Player | Opponent |")?;
            writeln!(out, "|-----:|-------:|---------:|")?;
            for (turn, (player, opponent)) in
                merge_series(&curve.player_series, &curve.opponent_series)
            {
                writeln!(
                    out,
                    "| {turn} | {} | {} |",
                    format_avg(player),
                    format_avg(opponent)
                )?;
            }
        }
        SimulationReport::BuyImpact(impact) => {
            writeln!(
                out,
                "- **Baseline win rate**: {:.1}%\n",
                impact.baseline_win_rate * 100.0
            )?;
            writeln!(out, "| Card | Win rate | Delta |")?;
            writeln!(out, "|------|---------:|------:|")?;
            for row in &impact.candidates {
                writeln!(
                    out,
                    "| {} | {:.1}% | {:+.1}% |",
                    row.card,
                    row.win_rate * 100.0,
                    row.delta * 100.0
                )?;
            }
        }
        SimulationReport::BotComparison(comparison) => {
            writeln!(out, "| Bot | Win rate | Trials |")?;
            writeln!(out, "|-----|---------:|-------:|")?;
            for row in &comparison.bots {
                writeln!(
                    out,
                    "| {} | {:.1}% | {} |",
                    row.bot.label(),
                    row.win_rate * 100.0,
                    row.trials
                )?;
            }
        }
    }
    Ok(())
}

/// Zip the two truncated series by turn. Either side may be absent at a
/// given turn once its own truncation has kicked in.
fn merge_series(
    player: &[TurnAverage],
    opponent: &[TurnAverage],
) -> BTreeMap<u32, (Option<f64>, Option<f64>)> {
    let mut merged: BTreeMap<u32, (Option<f64>, Option<f64>)> = BTreeMap::new();
    for point in player {
        merged.entry(point.turn).or_default().0 = Some(point.authority);
    }
    for point in opponent {
        merged.entry(point.turn).or_default().1 = Some(point.authority);
    }
    merged
}

fn format_avg(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |avg| format!("{avg:.1}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{BotWinRate, BuyImpactRow};
    use corsair_game::BotId;

    fn sample_curve() -> SimulationReport {
        SimulationReport::Authority(AuthorityCurve {
            player_series: vec![
                TurnAverage {
                    turn: 1,
                    authority: 50.0,
                },
                TurnAverage {
                    turn: 2,
                    authority: 42.5,
                },
            ],
            opponent_series: vec![TurnAverage {
                turn: 1,
                authority: 48.0,
            }],
            win_rate: 0.55,
            trials: 200,
        })
    }

    #[test]
    fn console_report_includes_win_rate_and_turns() {
        let mut buffer = Vec::new();
        generate_console_report(&mut buffer, &sample_curve(), Duration::from_millis(12)).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("55.0%"));
        assert!(text.contains("42.5"));
        // The opponent series truncated earlier, so turn 2 shows a gap.
        assert!(text.contains('-'));
    }

    #[test]
    fn json_report_is_parseable() {
        let mut buffer = Vec::new();
        generate_json_report(&mut buffer, &sample_curve()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["mode"], "authority");
        assert_eq!(value["trials"], 200);
    }

    #[test]
    fn markdown_report_tabulates_buy_impact() {
        let report = SimulationReport::BuyImpact(BuyImpactReport {
            baseline_win_rate: 0.5,
            candidates: vec![BuyImpactRow {
                card: "Cutter".to_string(),
                win_rate: 0.58,
                delta: 0.08,
            }],
        });
        let mut buffer = Vec::new();
        generate_markdown_report(&mut buffer, &report).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("| Cutter | 58.0% | +8.0% |"));
    }

    #[test]
    fn markdown_report_tabulates_bot_comparison() {
        let report = SimulationReport::BotComparison(BotComparisonReport {
            bots: vec![BotWinRate {
                bot: BotId::Velocity,
                win_rate: 0.61,
                trials: 500,
            }],
        });
        let mut buffer = Vec::new();
        generate_markdown_report(&mut buffer, &report).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("| VelocityBot | 61.0% | 500 |"));
    }
}
