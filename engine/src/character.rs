use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::ability::{Ability, ability_mod};

/// Score assumed for an ability the snapshot does not carry.
pub const DEFAULT_SCORE: i32 = 10;

/// Read-only character snapshot as sent by the narration backend.
///
/// Snapshots can lag behind the server, so every lookup defaults instead of
/// failing: a missing stat reads as 10, a missing skill list as no proficiencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Character {
    #[serde(default, deserialize_with = "stats_skipping_nulls")]
    pub stats: IndexMap<String, i32>,
    #[serde(default = "default_level", deserialize_with = "level_or_default")]
    pub level: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: BTreeSet<String>,
}

fn default_level() -> u32 {
    1
}

/// Treats an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn level_or_default<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_else(default_level))
}

/// Null stats map reads as empty; null scores are dropped so they default to 10.
fn stats_skipping_nulls<'de, D>(deserializer: D) -> Result<IndexMap<String, i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<IndexMap<String, Option<i32>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, score)| score.map(|s| (key, s)))
        .collect())
}

impl Character {
    pub fn new(level: u32) -> Self {
        Self {
            stats: IndexMap::new(),
            level,
            skills: BTreeSet::new(),
        }
    }

    pub fn with_stat(mut self, ability: Ability, score: i32) -> Self {
        self.stats.insert(ability.name().to_string(), score);
        self
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.insert(skill.into());
        self
    }

    /// The stored score for `ability`, if the snapshot has one.
    pub fn stat(&self, ability: Ability) -> Option<i32> {
        self.stats
            .iter()
            .find(|(key, _)| ability.matches_key(key))
            .map(|(_, score)| *score)
    }

    pub fn score(&self, ability: Ability) -> i32 {
        self.stat(ability).unwrap_or(DEFAULT_SCORE)
    }

    pub fn ability_mod(&self, ability: Ability) -> i32 {
        ability_mod(self.score(ability))
    }

    pub fn is_proficient(&self, skill: &str) -> bool {
        let skill = skill.trim();
        !skill.is_empty()
            && self
                .skills
                .iter()
                .any(|s| s.trim().eq_ignore_ascii_case(skill))
    }

    pub fn proficiency_bonus(&self) -> i32 {
        proficiency_bonus(self.level)
    }
}

/// Standard 5e progression: +2 at levels 1-4, +3 at 5-8, and so on.
/// Levels below 1 count as level 1.
pub fn proficiency_bonus(level: u32) -> i32 {
    ((level.max(1) - 1) / 4) as i32 + 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_lookup_accepts_abbreviations_and_case() {
        let mut c = Character::new(1);
        c.stats.insert("DEX".into(), 14);
        c.stats.insert("Wisdom".into(), 8);
        assert_eq!(c.score(Ability::Dexterity), 14);
        assert_eq!(c.score(Ability::Wisdom), 8);
        assert_eq!(c.score(Ability::Strength), DEFAULT_SCORE);
    }

    #[test]
    fn skill_match_ignores_case_and_padding() {
        let c = Character::new(1).with_skill("Stealth");
        assert!(c.is_proficient("stealth"));
        assert!(c.is_proficient(" Stealth "));
        assert!(!c.is_proficient("Athletics"));
        assert!(!c.is_proficient(""));
    }

    #[test]
    fn level_zero_counts_as_one() {
        assert_eq!(proficiency_bonus(0), 2);
    }

    #[test]
    fn huge_level_does_not_wrap() {
        assert_eq!(proficiency_bonus(u32::MAX), 1_073_741_825);
    }

    #[test]
    fn explicit_nulls_read_as_missing() {
        let c: Character = serde_json::from_str(
            r#"{"stats":{"dexterity":14,"wisdom":null},"level":null,"skills":null}"#,
        )
        .unwrap();
        assert_eq!(c.level, 1);
        assert!(c.skills.is_empty());
        assert_eq!(c.score(Ability::Dexterity), 14);
        assert_eq!(c.stat(Ability::Wisdom), None);

        let c: Character = serde_json::from_str(r#"{"stats":null}"#).unwrap();
        assert!(c.stats.is_empty());
    }

    #[test]
    fn deserializes_without_skills_or_level() {
        let c: Character = serde_json::from_str(r#"{"stats":{"strength":16}}"#).unwrap();
        assert_eq!(c.level, 1);
        assert!(c.skills.is_empty());
        assert_eq!(c.ability_mod(Ability::Strength), 3);
    }
}
