use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

/// Casino game types matching the frontend's game list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum GameType {
    Dice = 0,
    Mines = 1,
    DragonTower = 2,
    Wheel = 3,
    #[serde(rename = "hilo")]
    HiLo = 4,
}

impl GameType {
    pub const ALL: [GameType; 5] = [
        GameType::Dice,
        GameType::Mines,
        GameType::DragonTower,
        GameType::Wheel,
        GameType::HiLo,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Dice),
            1 => Some(Self::Mines),
            2 => Some(Self::DragonTower),
            3 => Some(Self::Wheel),
            4 => Some(Self::HiLo),
            _ => None,
        }
    }

    /// Stable identifier used in configs and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dice => "dice",
            Self::Mines => "mines",
            Self::DragonTower => "dragon_tower",
            Self::Wheel => "wheel",
            Self::HiLo => "hilo",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "dice" => Ok(Self::Dice),
            "mines" => Ok(Self::Mines),
            "dragon_tower" | "tower" => Ok(Self::DragonTower),
            "wheel" => Ok(Self::Wheel),
            "hilo" | "hi_lo" => Ok(Self::HiLo),
            _ => Err(ParseError {
                kind: "game",
                value: s.to_string(),
            }),
        }
    }
}

/// Difficulty preset shared by Dice quick-picks, Dragon Tower and Wheel.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Difficulty {
    Easy = 0,
    #[default]
    Medium = 1,
    Hard = 2,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Easy),
            1 => Some(Self::Medium),
            2 => Some(Self::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ParseError {
                kind: "difficulty",
                value: s.to_string(),
            }),
        }
    }
}
