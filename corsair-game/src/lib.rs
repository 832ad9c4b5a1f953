//! Corsair game core
//!
//! State descriptions, zone parsing, validation, and the playout-engine
//! boundary for the Corsair duel simulator. This crate owns everything a
//! batch driver needs short of the rules engine itself: the card/gambit
//! catalog, the textual zone mini-language, the mode-aware validator, and
//! the trial-outcome types engines produce.

pub mod bots;
pub mod catalog;
pub mod outcome;
pub mod playout;
pub mod spec;
pub mod validate;

// Re-export commonly used types
pub use bots::BotId;
pub use catalog::{Card, CardCatalog, CardKind, CardSet, Faction, Gambit};
pub use outcome::{TrialOutcome, Winner};
pub use playout::{DemoEngine, PlayoutEngine, PlayoutError};
pub use spec::{
    CardToken, CurrentPlayer, GameStateSpec, MAX_MULTIPLIER, ValidationError, Zone, ZoneSpec,
    parse_zone,
};
pub use validate::{SimulationMode, TrialLimits, validate};
