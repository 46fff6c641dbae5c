use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Dice;

/// Errors from parsing patterns, selections and commands.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown pattern `{0}`")]
    UnknownPattern(String),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("invalid burst size `{0}`")]
    BurstSize(String),
}

/// The explosion shape of a firework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    /// Classic round burst.
    Peony,
    /// Slow drooping streaks.
    Willow,
    /// Three concentric rotating rings.
    Ring,
    /// Clusters that sparkle a moment after the burst.
    Crackle,
    /// Dense, very slow willow branches.
    Palm,
    /// Stars that split into secondary bursts.
    Crossette,
}

impl Pattern {
    pub const ALL: [Pattern; 6] = [
        Pattern::Peony,
        Pattern::Willow,
        Pattern::Ring,
        Pattern::Crackle,
        Pattern::Palm,
        Pattern::Crossette,
    ];

    /// Uniformly random pattern.
    pub fn random(dice: &mut Dice) -> Pattern {
        *dice.pick(&Pattern::ALL)
    }

    /// Size scale a launched shell of this pattern gets.
    pub fn launch_size(&self) -> f64 {
        match self {
            Pattern::Peony => 1.2,
            Pattern::Willow => 0.9,
            Pattern::Ring => 1.1,
            _ => 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Peony => "peony",
            Pattern::Willow => "willow",
            Pattern::Ring => "ring",
            Pattern::Crackle => "crackle",
            Pattern::Palm => "palm",
            Pattern::Crossette => "crossette",
        }
    }

    /// One-line description for UI tooltips.
    pub fn description(&self) -> &'static str {
        match self {
            Pattern::Peony => "Classic round burst explosion",
            Pattern::Willow => "Long falling trail effects",
            Pattern::Ring => "Perfect circle patterns",
            Pattern::Crackle => "Multiple crackling bursts",
            Pattern::Palm => "Branching palm tree effect",
            Pattern::Crossette => "Secondary explosions",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::ALL
            .iter()
            .find(|pattern| pattern.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| ParseError::UnknownPattern(s.to_string()))
    }
}

/// Which pattern new shells get when the caller does not ask for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Selection {
    #[default]
    Random,
    Pattern(Pattern),
}

impl Selection {
    /// The fixed pattern, if any.
    pub fn pattern(&self) -> Option<Pattern> {
        match self {
            Selection::Random => None,
            Selection::Pattern(pattern) => Some(*pattern),
        }
    }

    /// Resolves the selection, rolling a pattern when random.
    pub fn resolve(&self, dice: &mut Dice) -> Pattern {
        self.pattern().unwrap_or_else(|| Pattern::random(dice))
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Random => f.write_str("random"),
            Selection::Pattern(pattern) => pattern.fmt(f),
        }
    }
}

impl FromStr for Selection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("random") {
            Ok(Selection::Random)
        } else {
            s.parse().map(Selection::Pattern)
        }
    }
}

impl TryFrom<String> for Selection {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Selection> for String {
    fn from(selection: Selection) -> Self {
        selection.to_string()
    }
}
