use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    #[serde(alias = "str", alias = "Strength", alias = "STR")]
    Strength,
    #[serde(alias = "dex", alias = "Dexterity", alias = "DEX")]
    Dexterity,
    #[serde(alias = "con", alias = "Constitution", alias = "CON")]
    Constitution,
    #[serde(alias = "int", alias = "Intelligence", alias = "INT")]
    Intelligence,
    #[serde(alias = "wis", alias = "Wisdom", alias = "WIS")]
    Wisdom,
    #[serde(alias = "cha", alias = "Charisma", alias = "CHA")]
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Ability::Strength => "strength",
            Ability::Dexterity => "dexterity",
            Ability::Constitution => "constitution",
            Ability::Intelligence => "intelligence",
            Ability::Wisdom => "wisdom",
            Ability::Charisma => "charisma",
        }
    }

    pub fn abbrev(self) -> &'static str {
        match self {
            Ability::Strength => "str",
            Ability::Dexterity => "dex",
            Ability::Constitution => "con",
            Ability::Intelligence => "int",
            Ability::Wisdom => "wis",
            Ability::Charisma => "cha",
        }
    }

    /// True if `key` names this ability, by full name or abbreviation, in any case.
    pub fn matches_key(self, key: &str) -> bool {
        let key = key.trim();
        key.eq_ignore_ascii_case(self.name()) || key.eq_ignore_ascii_case(self.abbrev())
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Ability {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ability::ALL
            .into_iter()
            .find(|a| a.matches_key(s))
            .ok_or_else(|| RequestError::Invalid(format!("unknown ability '{}'", s)))
    }
}

/// D&D ability modifier = floor((score - 10) / 2) for integer scores.
pub fn ability_mod(score: i32) -> i32 {
    // Widened so extreme scores cannot overflow; the result always fits back in i32.
    // `div_euclid` with positive divisor matches mathematical floor division.
    (i64::from(score) - 10).div_euclid(2) as i32
}
