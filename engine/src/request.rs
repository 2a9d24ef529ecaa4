use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ability::Ability;
use crate::error::RequestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvantageState {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl AdvantageState {
    /// Merge two sources. Advantage and disadvantage cancel; neither stacks.
    pub fn combine(self, other: AdvantageState) -> AdvantageState {
        use AdvantageState::*;
        match (self, other) {
            (Disadvantage, Advantage) | (Advantage, Disadvantage) => Normal,
            (Normal, x) => x,
            (x, Normal) => x,
            (Advantage, Advantage) => Advantage,
            (Disadvantage, Disadvantage) => Disadvantage,
        }
    }

    /// Folds every source that applies to a roll into one state.
    pub fn combine_all(sources: impl IntoIterator<Item = AdvantageState>) -> AdvantageState {
        sources
            .into_iter()
            .fold(AdvantageState::Normal, AdvantageState::combine)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AdvantageState::Normal => "normal",
            AdvantageState::Advantage => "advantage",
            AdvantageState::Disadvantage => "disadvantage",
        }
    }
}

impl fmt::Display for AdvantageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdvantageState {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "" => Ok(AdvantageState::Normal),
            "advantage" | "adv" => Ok(AdvantageState::Advantage),
            "disadvantage" | "dis" => Ok(AdvantageState::Disadvantage),
            other => Err(RequestError::Invalid(format!(
                "unknown advantage state '{}'",
                other
            ))),
        }
    }
}

/// Descriptive difficulty label. Resolution only ever looks at the numeric DC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DcBand {
    Trivial,
    Easy,
    Moderate,
    Hard,
    VeryHard,
    NearlyImpossible,
}

impl DcBand {
    pub const ALL: [DcBand; 6] = [
        DcBand::Trivial,
        DcBand::Easy,
        DcBand::Moderate,
        DcBand::Hard,
        DcBand::VeryHard,
        DcBand::NearlyImpossible,
    ];

    pub fn typical_dc(self) -> i32 {
        match self {
            DcBand::Trivial => 5,
            DcBand::Easy => 10,
            DcBand::Moderate => 15,
            DcBand::Hard => 20,
            DcBand::VeryHard => 25,
            DcBand::NearlyImpossible => 30,
        }
    }

    /// Highest band whose typical DC does not exceed `dc`.
    pub fn for_dc(dc: i32) -> DcBand {
        DcBand::ALL
            .into_iter()
            .rev()
            .find(|b| b.typical_dc() <= dc)
            .unwrap_or(DcBand::Trivial)
    }
}

/// One check requested by the DM service for a narrative beat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckRequest {
    pub ability: Ability,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
    pub dc: i32,
    /// Labels this build does not know are dropped rather than rejected.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "known_band"
    )]
    pub dc_band: Option<DcBand>,
    #[serde(default)]
    pub advantage_state: AdvantageState,
    /// Situational bonuses granted by the DM (guidance, inspiration).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub other_bonuses: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

fn is_zero(v: &i32) -> bool {
    *v == 0
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BandLabel {
    Known(DcBand),
    Unknown(serde::de::IgnoredAny),
}

fn known_band<'de, D>(deserializer: D) -> Result<Option<DcBand>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<BandLabel>::deserialize(deserializer)? {
        Some(BandLabel::Known(band)) => Some(band),
        Some(BandLabel::Unknown(_)) => {
            tracing::debug!("ignoring unrecognised dc_band label");
            None
        }
        None => None,
    })
}

impl CheckRequest {
    pub fn new(ability: Ability, dc: i32) -> Self {
        Self {
            ability,
            skill: None,
            dc,
            dc_band: None,
            advantage_state: AdvantageState::Normal,
            other_bonuses: 0,
            action_context: None,
            reason: None,
        }
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = Some(skill.into());
        self
    }

    pub fn with_advantage(mut self, state: AdvantageState) -> Self {
        self.advantage_state = state;
        self
    }

    pub fn from_json(text: &str) -> Result<Self, RequestError> {
        let req: CheckRequest = serde_json::from_str(text)?;
        Ok(req.normalized())
    }

    pub fn from_yaml(text: &str) -> Result<Self, RequestError> {
        let req: CheckRequest = serde_yaml::from_str(text)?;
        Ok(req.normalized())
    }

    /// Normalises ancillary fields. A blank skill is treated as no skill.
    pub fn normalized(mut self) -> Self {
        self.skill = self
            .skill
            .take()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }

    /// The band the DM labelled this check with, or the one its DC falls into.
    pub fn band(&self) -> DcBand {
        self.dc_band.unwrap_or_else(|| DcBand::for_dc(self.dc))
    }
}
