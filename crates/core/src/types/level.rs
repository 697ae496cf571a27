//! Kit levels.
//!
//! Every Atribot kit unlocks exactly one level. Levels are totally ordered by
//! their `number`, and a learner holding level `n` can see every course at
//! level `n` or below.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Persisted identifier of a level (`LEVEL_1` .. `LEVEL_5`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum LevelId {
    #[default]
    #[serde(rename = "LEVEL_1")]
    Level1,
    #[serde(rename = "LEVEL_2")]
    Level2,
    #[serde(rename = "LEVEL_3")]
    Level3,
    #[serde(rename = "LEVEL_4")]
    Level4,
    #[serde(rename = "LEVEL_5")]
    Level5,
}

/// Static description of a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub id: LevelId,
    /// Rank used for gating, 1..=5.
    pub number: u8,
    pub name: &'static str,
    pub description: &'static str,
    /// Emoji shown on badges and cards.
    pub icon: &'static str,
    /// CSS class carrying the level's colour.
    pub color: &'static str,
}

/// The level catalog, ordered by rank.
pub static LEVELS: [Level; 5] = [
    Level {
        id: LevelId::Level1,
        number: 1,
        name: "Starter Bot",
        description: "Build your very first robot friend and light it up with LEDs and buzzers.",
        icon: "🤖",
        color: "level-1",
    },
    Level {
        id: LevelId::Level2,
        number: 2,
        name: "Gear Builder",
        description: "Put motors, wheels and gears together to make robots that move.",
        icon: "⚙️",
        color: "level-2",
    },
    Level {
        id: LevelId::Level3,
        number: 3,
        name: "Robot Explorer",
        description: "Add sensors so your robots can see, hear and react to the world around them.",
        icon: "🔍",
        color: "level-3",
    },
    Level {
        id: LevelId::Level4,
        number: 4,
        name: "Circuit Master",
        description: "Wire up circuits and program microcontrollers to give your robots autonomous behaviours.",
        icon: "⚡",
        color: "level-4",
    },
    Level {
        id: LevelId::Level5,
        number: 5,
        name: "Atribot Pro",
        description: "Design competition-ready robots with advanced coding and mechanics.",
        icon: "🏆",
        color: "level-5",
    },
];

/// Error returned when a string is not a known level identifier.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown level: {0}")]
pub struct UnknownLevel(pub String);

impl LevelId {
    /// All levels, lowest rank first.
    pub const ALL: [Self; 5] = [
        Self::Level1,
        Self::Level2,
        Self::Level3,
        Self::Level4,
        Self::Level5,
    ];

    /// Catalog entry for this level.
    #[must_use]
    pub const fn info(self) -> &'static Level {
        match self {
            Self::Level1 => &LEVELS[0],
            Self::Level2 => &LEVELS[1],
            Self::Level3 => &LEVELS[2],
            Self::Level4 => &LEVELS[3],
            Self::Level5 => &LEVELS[4],
        }
    }

    /// Rank of this level (1..=5).
    #[must_use]
    pub const fn number(self) -> u8 {
        self.info().number
    }

    /// Display name, e.g. "Starter Bot".
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.info().name
    }

    /// Look a level up by rank.
    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::Level1),
            2 => Some(Self::Level2),
            3 => Some(Self::Level3),
            4 => Some(Self::Level4),
            5 => Some(Self::Level5),
            _ => None,
        }
    }

    /// The level one rank above this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// Persisted identifier, e.g. `LEVEL_3`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Level1 => "LEVEL_1",
            Self::Level2 => "LEVEL_2",
            Self::Level3 => "LEVEL_3",
            Self::Level4 => "LEVEL_4",
            Self::Level5 => "LEVEL_5",
        }
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LevelId {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownLevel(s.to_owned()))
    }
}
