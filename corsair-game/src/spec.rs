//! Textual game-state descriptions and the zone mini-language.
//!
//! Each zone of an in-progress duel is described as a comma-separated list
//! of card names, where a name may carry a `*count` repeat suffix
//! (`"Scout*3, Viper"`). Parsing never aborts early: every malformed
//! segment produces its own [`ValidationError`] and well-formed siblings
//! still yield tokens.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bots::BotId;
use crate::catalog::CardCatalog;

/// Largest repeat count a single token may carry.
pub const MAX_MULTIPLIER: i64 = 100;

/// The textual zones of a state description, one per field of
/// [`GameStateSpec`]. The opponent's hand and deck are a single combined
/// field: from the focal player's seat the split between them is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    TradeRow,
    Hand,
    Deck,
    Discard,
    BasesInPlay,
    Gambits,
    OpponentHandAndDeck,
    OpponentDiscard,
    OpponentBasesInPlay,
    OpponentGambits,
}

impl Zone {
    pub const ALL: [Self; 10] = [
        Self::TradeRow,
        Self::Hand,
        Self::Deck,
        Self::Discard,
        Self::BasesInPlay,
        Self::Gambits,
        Self::OpponentHandAndDeck,
        Self::OpponentDiscard,
        Self::OpponentBasesInPlay,
        Self::OpponentGambits,
    ];

    /// Label used in error messages, matching the state form's field names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TradeRow => "Trade Row",
            Self::Hand => "Hand",
            Self::Deck => "Deck",
            Self::Discard => "Discard",
            Self::BasesInPlay => "Bases in Play",
            Self::Gambits => "Gambits",
            Self::OpponentHandAndDeck => "Opponent Hand and Deck",
            Self::OpponentDiscard => "Opponent Discard",
            Self::OpponentBasesInPlay => "Opponent Bases in Play",
            Self::OpponentGambits => "Opponent Gambits",
        }
    }

    /// Gambit zones resolve names against the gambit pool instead of the
    /// card catalog.
    #[must_use]
    pub const fn is_gambit(self) -> bool {
        matches!(self, Self::Gambits | Self::OpponentGambits)
    }

    /// Whether this zone belongs to the opponent's side of the table.
    #[must_use]
    pub const fn is_opponent(self) -> bool {
        matches!(
            self,
            Self::OpponentHandAndDeck
                | Self::OpponentDiscard
                | Self::OpponentBasesInPlay
                | Self::OpponentGambits
        )
    }
}

/// One parsed unit of a zone: a canonical catalog name plus a repeat
/// count. A count of zero is accepted and simply contributes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardToken {
    pub name: String,
    pub count: u32,
}

/// Parsed contents of one zone, in input order.
pub type ZoneSpec = Vec<CardToken>;

/// A user-input problem: the offending field plus the full message shown
/// to the operator. Any non-empty list of these blocks simulation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Whose turn it is in the described state. `Random` lets each trial flip
/// a seeded coin, which is meaningless when judging a specific buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CurrentPlayer {
    Player,
    Opponent,
    #[default]
    Random,
}

/// Full description of an in-progress duel, as entered by an operator.
///
/// Constructed fresh per request and treated as immutable once handed to
/// the batch runner; trials share it read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStateSpec {
    pub turn: u32,
    pub authority: i32,
    pub opponent_authority: i32,
    pub shuffles: i32,
    pub opponent_shuffles: i32,
    pub bot: BotId,
    pub opponent_bot: BotId,
    pub current_player: CurrentPlayer,
    pub include_base_set: bool,
    pub include_expansion: bool,
    pub trade_row: String,
    pub hand: String,
    pub deck: String,
    pub discard: String,
    pub bases_in_play: String,
    pub gambits: String,
    pub opponent_hand_and_deck: String,
    pub opponent_discard: String,
    pub opponent_bases_in_play: String,
    pub opponent_gambits: String,
}

impl Default for GameStateSpec {
    fn default() -> Self {
        Self {
            turn: 1,
            authority: 50,
            opponent_authority: 50,
            shuffles: 0,
            opponent_shuffles: 0,
            bot: BotId::default(),
            opponent_bot: BotId::default(),
            current_player: CurrentPlayer::default(),
            include_base_set: true,
            include_expansion: false,
            trade_row: String::new(),
            hand: String::new(),
            deck: String::new(),
            discard: String::new(),
            bases_in_play: String::new(),
            gambits: String::new(),
            opponent_hand_and_deck: String::new(),
            opponent_discard: String::new(),
            opponent_bases_in_play: String::new(),
            opponent_gambits: String::new(),
        }
    }
}

impl GameStateSpec {
    /// The raw text of one zone field.
    #[must_use]
    pub fn zone_text(&self, zone: Zone) -> &str {
        match zone {
            Zone::TradeRow => &self.trade_row,
            Zone::Hand => &self.hand,
            Zone::Deck => &self.deck,
            Zone::Discard => &self.discard,
            Zone::BasesInPlay => &self.bases_in_play,
            Zone::Gambits => &self.gambits,
            Zone::OpponentHandAndDeck => &self.opponent_hand_and_deck,
            Zone::OpponentDiscard => &self.opponent_discard,
            Zone::OpponentBasesInPlay => &self.opponent_bases_in_play,
            Zone::OpponentGambits => &self.opponent_gambits,
        }
    }

    /// Parse one zone against the catalog.
    #[must_use]
    pub fn parse_zone(&self, zone: Zone, catalog: &CardCatalog) -> (ZoneSpec, Vec<ValidationError>) {
        parse_zone(self.zone_text(zone), zone, catalog)
    }
}

/// Parse a zone's text into tokens plus the errors for every malformed
/// segment.
///
/// Empty or whitespace-only input is an empty zone, not an error. A
/// segment may report both a bad multiplier and a bad name; it yields a
/// token only when both parts resolve.
#[must_use]
pub fn parse_zone(text: &str, zone: Zone, catalog: &CardCatalog) -> (ZoneSpec, Vec<ValidationError>) {
    let mut tokens = ZoneSpec::new();
    let mut errors = Vec::new();

    if text.trim().is_empty() {
        return (tokens, errors);
    }

    for segment in text.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let (name_part, count) = match segment.split_once('*') {
            Some((name, raw_count)) => match parse_multiplier(raw_count) {
                Some(count) => (name, Some(count)),
                None => {
                    errors.push(ValidationError::new(
                        zone.label(),
                        format!("{} has invalid card multiplier: {segment}", zone.label()),
                    ));
                    (name, None)
                }
            },
            None => (segment, Some(1)),
        };

        let resolved = if zone.is_gambit() {
            catalog.lookup_gambit(name_part).map(|g| g.name.clone())
        } else {
            catalog.lookup(name_part).map(|c| c.name.clone())
        };

        match resolved {
            Some(name) => {
                if let Some(count) = count {
                    tokens.push(CardToken { name, count });
                }
            }
            None => {
                let noun = if zone.is_gambit() { "gambit" } else { "card" };
                errors.push(ValidationError::new(
                    zone.label(),
                    format!("{} has invalid {noun} name: {segment}", zone.label()),
                ));
            }
        }
    }

    (tokens, errors)
}

fn parse_multiplier(raw: &str) -> Option<u32> {
    let value: i64 = raw.trim().parse().ok()?;
    if (0..=MAX_MULTIPLIER).contains(&value) {
        u32::try_from(value).ok()
    } else {
        None
    }
}
