use std::fmt;

use serde::{Deserialize, Serialize};

/// Built-in decision policies a player can be driven by.
///
/// The policies themselves live in the playout engine; this crate only
/// needs their identities, because validation treats the scripted bot
/// specially and the comparison sweep iterates over the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BotId {
    #[default]
    Velocity,
    Attack,
    Defense,
    EndGame,
    Scripted,
}

impl BotId {
    pub const ALL: [Self; 5] = [
        Self::Velocity,
        Self::Attack,
        Self::Defense,
        Self::EndGame,
        Self::Scripted,
    ];

    /// Display name used in state descriptions and reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Velocity => "VelocityBot",
            Self::Attack => "AttackBot",
            Self::Defense => "DefenseAndBaseBot",
            Self::EndGame => "EndGameBot",
            Self::Scripted => "SimulatorBot",
        }
    }

    /// The scripted bot replays a fixed decision script; its playouts are
    /// far costlier and it cannot be substituted mid-sweep.
    #[must_use]
    pub const fn is_scripted(self) -> bool {
        matches!(self, Self::Scripted)
    }

    /// Resolve a display name, ignoring case.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|bot| bot.label().eq_ignore_ascii_case(wanted))
    }

    /// Default candidate list for the bot-comparison sweep: every
    /// non-scripted policy.
    #[must_use]
    pub fn comparison_candidates() -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|bot| !bot.is_scripted())
            .collect()
    }
}

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
