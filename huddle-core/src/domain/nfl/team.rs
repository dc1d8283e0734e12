use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Conference {
    #[serde(rename = "AFC")]
    Afc,
    #[serde(rename = "NFC")]
    Nfc,
}

impl Conference {
    pub const ALL: [Conference; 2] = [Conference::Afc, Conference::Nfc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Conference::Afc => "AFC",
            Conference::Nfc => "NFC",
        }
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Conference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AFC" => Ok(Conference::Afc),
            "NFC" => Ok(Conference::Nfc),
            other => Err(format!("unknown conference '{other}'")),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Division {
    East,
    North,
    South,
    West,
}

impl Division {
    pub const ALL: [Division; 4] =
        [Division::East, Division::North, Division::South, Division::West];

    pub fn as_str(&self) -> &'static str {
        match self {
            Division::East => "East",
            Division::North => "North",
            Division::South => "South",
            Division::West => "West",
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Division {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "East" => Ok(Division::East),
            "North" => Ok(Division::North),
            "South" => Ok(Division::South),
            "West" => Ok(Division::West),
            other => Err(format!("unknown division '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: Uuid,
    pub team_code: String,
    pub team_name: String,
    pub team_city: String,
    pub conference: Conference,
    pub division: Division,
    /// Draft value shown on the selection board.
    pub points: i32,
    pub is_active: bool,
}

impl Team {
    /// "City Name", e.g. "Kansas City Chiefs".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.team_city, self.team_name)
    }
}
