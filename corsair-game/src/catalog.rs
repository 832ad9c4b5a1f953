use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Which release a card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardSet {
    Core,
    Expansion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    TradeFederation,
    Blob,
    StarEmpire,
    MachineCult,
    Unaligned,
}

/// Outposts must be destroyed before the owner can be attacked; the
/// distinction only matters to engines, not to validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Ship,
    Base,
    Outpost,
}

/// A purchasable (or starter) card as known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub faction: Faction,
    pub kind: CardKind,
    pub cost: u8,
    pub set: CardSet,
}

/// A gambit: a one-shot card tracked outside the normal zones and never
/// present in the trade row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gambit {
    pub name: String,
}

/// Container for all card and gambit data.
///
/// Lookups are case-insensitive and never fail hard: a miss is `None`.
/// The catalog is immutable once built, so shared references can be read
/// from any number of threads without synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CardCatalog {
    pub cards: Vec<Card>,
    pub gambits: Vec<Gambit>,
}

impl CardCatalog {
    /// Create an empty catalog (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into catalog data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The built-in catalog covering the core set, the expansion, and the
    /// gambit pool.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Look up a card by display name, ignoring case and surrounding
    /// whitespace.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Card> {
        let wanted = name.trim();
        if wanted.is_empty() {
            return None;
        }
        self.cards
            .iter()
            .find(|card| card.name.eq_ignore_ascii_case(wanted))
    }

    /// Look up a gambit by display name, ignoring case and surrounding
    /// whitespace.
    #[must_use]
    pub fn lookup_gambit(&self, name: &str) -> Option<&Gambit> {
        let wanted = name.trim();
        if wanted.is_empty() {
            return None;
        }
        self.gambits
            .iter()
            .find(|gambit| gambit.name.eq_ignore_ascii_case(wanted))
    }
}

static BUILTIN: Lazy<CardCatalog> = Lazy::new(|| {
    let cards = STARTER_CARDS
        .iter()
        .chain(CORE_CARDS)
        .map(|&(name, faction, kind, cost)| Card {
            name: name.to_string(),
            faction,
            kind,
            cost,
            set: CardSet::Core,
        })
        .chain(
            EXPANSION_CARDS
                .iter()
                .map(|&(name, faction, kind, cost)| Card {
                    name: name.to_string(),
                    faction,
                    kind,
                    cost,
                    set: CardSet::Expansion,
                }),
        )
        .collect();
    let gambits = GAMBITS
        .iter()
        .map(|&name| Gambit {
            name: name.to_string(),
        })
        .collect();
    CardCatalog { cards, gambits }
});

type CardRow = (&'static str, Faction, CardKind, u8);

const STARTER_CARDS: &[CardRow] = &[
    ("Scout", Faction::Unaligned, CardKind::Ship, 0),
    ("Viper", Faction::Unaligned, CardKind::Ship, 0),
    ("Explorer", Faction::Unaligned, CardKind::Ship, 2),
];

const CORE_CARDS: &[CardRow] = &[
    // Trade Federation
    ("Federation Shuttle", Faction::TradeFederation, CardKind::Ship, 1),
    ("Cutter", Faction::TradeFederation, CardKind::Ship, 2),
    ("Embassy Yacht", Faction::TradeFederation, CardKind::Ship, 3),
    ("Freighter", Faction::TradeFederation, CardKind::Ship, 4),
    ("Trade Escort", Faction::TradeFederation, CardKind::Ship, 5),
    ("Flagship", Faction::TradeFederation, CardKind::Ship, 6),
    ("Command Ship", Faction::TradeFederation, CardKind::Ship, 8),
    ("Trading Post", Faction::TradeFederation, CardKind::Outpost, 3),
    ("Barter World", Faction::TradeFederation, CardKind::Base, 4),
    ("Defense Center", Faction::TradeFederation, CardKind::Outpost, 5),
    ("Port Of Call", Faction::TradeFederation, CardKind::Outpost, 6),
    ("Central Office", Faction::TradeFederation, CardKind::Base, 7),
    // Blob
    ("Blob Fighter", Faction::Blob, CardKind::Ship, 1),
    ("Trade Pod", Faction::Blob, CardKind::Ship, 2),
    ("Battle Pod", Faction::Blob, CardKind::Ship, 2),
    ("Ram", Faction::Blob, CardKind::Ship, 3),
    ("Blob Destroyer", Faction::Blob, CardKind::Ship, 4),
    ("Battle Blob", Faction::Blob, CardKind::Ship, 6),
    ("Blob Carrier", Faction::Blob, CardKind::Ship, 6),
    ("Mothership", Faction::Blob, CardKind::Ship, 7),
    ("Blob Wheel", Faction::Blob, CardKind::Base, 3),
    ("The Hive", Faction::Blob, CardKind::Base, 5),
    ("Blob World", Faction::Blob, CardKind::Base, 8),
    // Star Empire
    ("Imperial Fighter", Faction::StarEmpire, CardKind::Ship, 1),
    ("Corvette", Faction::StarEmpire, CardKind::Ship, 2),
    ("Imperial Frigate", Faction::StarEmpire, CardKind::Ship, 3),
    ("Survey Ship", Faction::StarEmpire, CardKind::Ship, 3),
    ("Battlecruiser", Faction::StarEmpire, CardKind::Ship, 6),
    ("Dreadnaught", Faction::StarEmpire, CardKind::Ship, 7),
    ("Space Station", Faction::StarEmpire, CardKind::Outpost, 4),
    ("Recycling Station", Faction::StarEmpire, CardKind::Outpost, 4),
    ("War World", Faction::StarEmpire, CardKind::Outpost, 5),
    ("Royal Redoubt", Faction::StarEmpire, CardKind::Outpost, 6),
    ("Fleet HQ", Faction::StarEmpire, CardKind::Base, 8),
    // Machine Cult
    ("Trade Bot", Faction::MachineCult, CardKind::Ship, 1),
    ("Missile Bot", Faction::MachineCult, CardKind::Ship, 2),
    ("Supply Bot", Faction::MachineCult, CardKind::Ship, 3),
    ("Patrol Mech", Faction::MachineCult, CardKind::Ship, 4),
    ("Stealth Needle", Faction::MachineCult, CardKind::Ship, 4),
    ("Battle Mech", Faction::MachineCult, CardKind::Ship, 5),
    ("Missile Mech", Faction::MachineCult, CardKind::Ship, 6),
    ("Battle Station", Faction::MachineCult, CardKind::Outpost, 3),
    ("Mech World", Faction::MachineCult, CardKind::Outpost, 5),
    ("Junkyard", Faction::MachineCult, CardKind::Outpost, 6),
    ("Machine Base", Faction::MachineCult, CardKind::Outpost, 7),
    ("Brain World", Faction::MachineCult, CardKind::Outpost, 8),
];

const EXPANSION_CARDS: &[CardRow] = &[
    ("Solar Skiff", Faction::TradeFederation, CardKind::Ship, 1),
    ("Trade Hauler", Faction::TradeFederation, CardKind::Ship, 2),
    ("Patrol Cutter", Faction::TradeFederation, CardKind::Ship, 3),
    ("Frontier Ferry", Faction::TradeFederation, CardKind::Ship, 4),
    ("Colony Seed Ship", Faction::TradeFederation, CardKind::Ship, 5),
    ("Peacekeeper", Faction::TradeFederation, CardKind::Ship, 6),
    ("Storage Silo", Faction::TradeFederation, CardKind::Base, 2),
    ("Central Station", Faction::TradeFederation, CardKind::Base, 4),
    ("Loyal Colony", Faction::TradeFederation, CardKind::Outpost, 6),
    ("Swarmer", Faction::Blob, CardKind::Ship, 1),
    ("Predator", Faction::Blob, CardKind::Ship, 2),
    ("Ravager", Faction::Blob, CardKind::Ship, 3),
    ("Moonwurm", Faction::Blob, CardKind::Ship, 7),
    ("Leviathan", Faction::Blob, CardKind::Ship, 8),
    ("Bioformer", Faction::Blob, CardKind::Base, 4),
    ("Plasma Vent", Faction::Blob, CardKind::Outpost, 6),
    ("Star Barge", Faction::StarEmpire, CardKind::Ship, 1),
    ("Lancer", Faction::StarEmpire, CardKind::Ship, 2),
    ("Falcon", Faction::StarEmpire, CardKind::Ship, 3),
    ("Gunship", Faction::StarEmpire, CardKind::Ship, 4),
    ("Heavy Cruiser", Faction::StarEmpire, CardKind::Ship, 5),
    ("Emperor's Dreadnaught", Faction::StarEmpire, CardKind::Ship, 8),
    ("Orbital Platform", Faction::StarEmpire, CardKind::Outpost, 3),
    ("Command Center", Faction::StarEmpire, CardKind::Outpost, 4),
    ("Supply Depot", Faction::StarEmpire, CardKind::Base, 6),
    ("Battle Bot", Faction::MachineCult, CardKind::Ship, 1),
    ("Repair Bot", Faction::MachineCult, CardKind::Ship, 2),
    ("Convoy Bot", Faction::MachineCult, CardKind::Ship, 3),
    ("Mining Mech", Faction::MachineCult, CardKind::Ship, 5),
    ("Warning Beacon", Faction::MachineCult, CardKind::Base, 2),
    ("Stealth Tower", Faction::MachineCult, CardKind::Outpost, 5),
    ("Frontier Station", Faction::MachineCult, CardKind::Outpost, 6),
    ("The Incinerator", Faction::MachineCult, CardKind::Outpost, 8),
];

const GAMBITS: &[&str] = &[
    "Bold Raid",
    "Energy Shield",
    "Frontier Fleet",
    "Political Maneuver",
    "Rise To Power",
    "Salvage Operation",
    "Smuggling Run",
    "Surprise Assault",
    "Triumphant Return",
    "Veteran Pilots",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let catalog = CardCatalog::builtin();
        let card = catalog.lookup("federation shuttle").expect("known card");
        assert_eq!(card.name, "Federation Shuttle");
        assert_eq!(card.cost, 1);
        assert!(catalog.lookup("  BATTLE BLOB  ").is_some());
    }

    #[test]
    fn lookup_miss_is_none_not_error() {
        let catalog = CardCatalog::builtin();
        assert!(catalog.lookup("BogusCardXYZ").is_none());
        assert!(catalog.lookup("").is_none());
        assert!(catalog.lookup_gambit("Federation Shuttle").is_none());
    }

    #[test]
    fn gambits_resolve_separately_from_cards() {
        let catalog = CardCatalog::builtin();
        assert!(catalog.lookup_gambit("bold raid").is_some());
        assert!(catalog.lookup("Bold Raid").is_none());
    }

    #[test]
    fn catalog_loads_from_json() {
        let json = r#"{
            "cards": [
                {
                    "name": "Test Ship",
                    "faction": "blob",
                    "kind": "ship",
                    "cost": 3,
                    "set": "core"
                }
            ],
            "gambits": [{ "name": "Test Gambit" }]
        }"#;

        let catalog = CardCatalog::from_json(json).unwrap();
        assert_eq!(catalog.lookup("test ship").map(|c| c.cost), Some(3));
        assert!(catalog.lookup_gambit("test gambit").is_some());
    }
}
