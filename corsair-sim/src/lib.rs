//! Corsair batch simulator
//!
//! Orchestrates large batches of independent playouts over a validated
//! game-state description and folds the outcomes into one of three
//! aggregate reports: the authority-over-time curve, the per-card buy
//! impact table, or the per-bot win-rate comparison.

pub mod aggregate;
pub mod batch;
pub mod reports;

pub use aggregate::{
    AuthorityCurve, AuthorityCurveAggregator, BotComparisonAggregator, BotComparisonReport,
    BotWinRate, BuyImpactAggregator, BuyImpactReport, BuyImpactRow, SimulationReport, TurnAverage,
    WinRateTally,
};
pub use batch::{BatchConfig, SimulateError, simulate, trade_row_candidates};
