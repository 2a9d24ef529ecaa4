use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ability::{Ability, ability_mod};
use crate::character::{Character, DEFAULT_SCORE};
use crate::dice::Dice;
use crate::error::CheckError;
use crate::request::{AdvantageState, CheckRequest};

/// Margin at or above which a success is critical.
pub const CRITICAL_MARGIN: i32 = 10;
/// Margin at or above which a success is clear rather than marginal.
pub const CLEAR_MARGIN: i32 = 5;
/// Lowest margin that still counts as a marginal failure.
pub const MARGINAL_FAILURE_FLOOR: i32 = -4;
/// Lowest margin that still counts as a clear failure.
pub const CLEAR_FAILURE_FLOOR: i32 = -9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Modifier {
    pub ability_modifier: i32,
    pub proficiency_bonus: i32,
    pub total: i32,
}

/// Ability modifier plus proficiency for `skill`, if the character has it.
///
/// Never fails: a missing stat reads as 10 and an unknown skill adds nothing.
pub fn compute_modifier(character: &Character, ability: Ability, skill: Option<&str>) -> Modifier {
    let score = character.stat(ability).unwrap_or_else(|| {
        tracing::warn!(ability = %ability, "stat missing from character snapshot; using {}", DEFAULT_SCORE);
        DEFAULT_SCORE
    });
    let ability_modifier = ability_mod(score);
    let proficiency_bonus = match skill {
        Some(skill) if character.is_proficient(skill) => character.proficiency_bonus(),
        _ => 0,
    };
    Modifier {
        ability_modifier,
        proficiency_bonus,
        total: ability_modifier.saturating_add(proficiency_bonus),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct D20Roll {
    /// The die that counts toward the total.
    pub d20_roll: u8,
    /// Both raw draws when rolled with advantage or disadvantage.
    pub advantage_rolls: Option<[u8; 2]>,
}

impl D20Roll {
    pub fn raw(&self) -> Vec<u8> {
        match self.advantage_rolls {
            Some([a, b]) => vec![a, b],
            None => vec![self.d20_roll],
        }
    }
}

/// Roll the d20 for a check, or take the player's physical roll.
///
/// A manual roll is used verbatim (no second die even under advantage) and
/// must lie in 1..=20.
pub fn roll_d20(
    dice: &mut Dice,
    state: AdvantageState,
    manual_roll: Option<i32>,
) -> Result<D20Roll, CheckError> {
    if let Some(manual) = manual_roll {
        if !(1..=20).contains(&manual) {
            return Err(CheckError::InvalidRoll(manual));
        }
        tracing::debug!(manual_roll = manual, advantage_state = %state, "manual roll bypasses dice");
        return Ok(D20Roll {
            d20_roll: manual as u8,
            advantage_rolls: None,
        });
    }

    let first = dice.d20();
    let roll = match state {
        AdvantageState::Normal => D20Roll {
            d20_roll: first,
            advantage_rolls: None,
        },
        AdvantageState::Advantage => {
            let second = dice.d20();
            D20Roll {
                d20_roll: first.max(second),
                advantage_rolls: Some([first, second]),
            }
        }
        AdvantageState::Disadvantage => {
            let second = dice.d20();
            D20Roll {
                d20_roll: first.min(second),
                advantage_rolls: Some([first, second]),
            }
        }
    };
    Ok(roll)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    CriticalSuccess,
    ClearSuccess,
    MarginalSuccess,
    MarginalFailure,
    ClearFailure,
    CriticalFailure,
}

impl Outcome {
    /// Best to worst.
    pub const ALL: [Outcome; 6] = [
        Outcome::CriticalSuccess,
        Outcome::ClearSuccess,
        Outcome::MarginalSuccess,
        Outcome::MarginalFailure,
        Outcome::ClearFailure,
        Outcome::CriticalFailure,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::CriticalSuccess => "critical_success",
            Outcome::ClearSuccess => "clear_success",
            Outcome::MarginalSuccess => "marginal_success",
            Outcome::MarginalFailure => "marginal_failure",
            Outcome::ClearFailure => "clear_failure",
            Outcome::CriticalFailure => "critical_failure",
        }
    }

    pub fn is_critical(self) -> bool {
        matches!(self, Outcome::CriticalSuccess | Outcome::CriticalFailure)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grade a check. A natural 1 or 20 decides the tier outright; otherwise the
/// margin over the DC does.
pub fn classify_outcome(d20_roll: u8, margin: i32) -> Outcome {
    match d20_roll {
        1 => Outcome::CriticalFailure,
        20 => Outcome::CriticalSuccess,
        _ if margin >= CRITICAL_MARGIN => Outcome::CriticalSuccess,
        _ if margin >= CLEAR_MARGIN => Outcome::ClearSuccess,
        _ if margin >= 0 => Outcome::MarginalSuccess,
        _ if margin >= MARGINAL_FAILURE_FLOOR => Outcome::MarginalFailure,
        _ if margin >= CLEAR_FAILURE_FLOOR => Outcome::ClearFailure,
        _ => Outcome::CriticalFailure,
    }
}

/// The roll submitted back to the narration backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlayerRoll {
    pub d20_roll: u8,
    pub advantage_rolls: Option<[u8; 2]>,
    pub ability_modifier: i32,
    pub proficiency_bonus: i32,
    pub other_bonuses: i32,
    pub modifier: i32,
    pub total: i32,
    pub advantage_state: AdvantageState,
}

impl PlayerRoll {
    pub fn d20(&self) -> D20Roll {
        D20Roll {
            d20_roll: self.d20_roll,
            advantage_rolls: self.advantage_rolls,
        }
    }

    /// One-line description, e.g. `d20=11 vs d20=17 (keep=17) +4 = 21 vs DC 13 → clear_success`.
    pub fn summary(&self, dc: i32) -> String {
        let resolution = CheckResolution::derive(dc, self);
        format!(
            "{} {} = {} vs DC {} → {}",
            format_d20_sequence(&self.d20().raw(), self.d20_roll),
            format_modifier(self.modifier),
            self.total,
            dc,
            resolution.outcome
        )
    }
}

/// Derived view of a roll against its DC. Recomputed, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckResolution {
    pub success: bool,
    pub margin: i32,
    pub outcome: Outcome,
}

impl CheckResolution {
    /// The margin is taken in i64 and clamped, so its sign is exact for any total and DC.
    pub fn from_total(d20_roll: u8, total: i32, dc: i32) -> Self {
        let margin = clamp_i32(i64::from(total) - i64::from(dc));
        Self {
            success: margin >= 0,
            margin,
            outcome: classify_outcome(d20_roll, margin),
        }
    }

    pub fn derive(dc: i32, roll: &PlayerRoll) -> Self {
        Self::from_total(roll.d20_roll, roll.total, dc)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResolvedCheck {
    pub player_roll: PlayerRoll,
    pub resolution: CheckResolution,
}

/// Resolve one check request for a character.
pub fn resolve_check(
    dice: &mut Dice,
    character: &Character,
    request: &CheckRequest,
    manual_roll: Option<i32>,
) -> Result<ResolvedCheck, CheckError> {
    let modifier = compute_modifier(character, request.ability, request.skill.as_deref());
    let roll = roll_d20(dice, request.advantage_state, manual_roll)?;

    let total_modifier =
        clamp_i32(i64::from(modifier.total) + i64::from(request.other_bonuses));
    let total = clamp_i32(i64::from(roll.d20_roll) + i64::from(total_modifier));
    let player_roll = PlayerRoll {
        d20_roll: roll.d20_roll,
        advantage_rolls: roll.advantage_rolls,
        ability_modifier: modifier.ability_modifier,
        proficiency_bonus: modifier.proficiency_bonus,
        other_bonuses: request.other_bonuses,
        modifier: total_modifier,
        total,
        advantage_state: request.advantage_state,
    };
    let resolution = CheckResolution::derive(request.dc, &player_roll);

    tracing::debug!(
        ability = %request.ability,
        skill = request.skill.as_deref().unwrap_or("-"),
        dc = request.dc,
        d20 = roll.d20_roll,
        modifier = total_modifier,
        total,
        outcome = %resolution.outcome,
        "check resolved"
    );

    Ok(ResolvedCheck {
        player_roll,
        resolution,
    })
}

/* ---------------- bare modifier checks ---------------- */

#[derive(Debug, Clone, Copy)]
pub struct CheckInput {
    pub dc: i32,
    pub modifier: i32,
    pub mode: AdvantageState,
}

#[derive(Debug, Clone, Copy)]
pub struct CheckResult {
    pub roll: D20Roll,
    pub total: i32,
    pub dc: i32,
    pub resolution: CheckResolution,
}

/// Roll a d20 (with advantage/disadvantage), add a flat modifier, grade vs DC.
pub fn check(
    dice: &mut Dice,
    input: CheckInput,
    manual_roll: Option<i32>,
) -> Result<CheckResult, CheckError> {
    let roll = roll_d20(dice, input.mode, manual_roll)?;
    let total = clamp_i32(i64::from(roll.d20_roll) + i64::from(input.modifier));
    Ok(CheckResult {
        roll,
        total,
        dc: input.dc,
        resolution: CheckResolution::from_total(roll.d20_roll, total, input.dc),
    })
}

/// Totals beyond the i32 range pin to its bounds.
fn clamp_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

pub fn format_d20_sequence(raw: &[u8], kept: u8) -> String {
    match raw {
        [] => format!("d20=? (keep={})", kept),
        [only] => format!("d20={}", only),
        [first, second] => format!("d20={} vs d20={} (keep={})", first, second, kept),
        _ => {
            let joined = raw
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("d20s=[{}] (keep={})", joined, kept)
        }
    }
}

pub fn format_modifier(modifier: i32) -> String {
    if modifier >= 0 {
        format!("+{}", modifier)
    } else {
        format!("-{}", modifier.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_roll_ignores_advantage() {
        let mut dice = Dice::from_scripted(vec![2, 3]).unwrap();
        let r = roll_d20(&mut dice, AdvantageState::Advantage, Some(14)).unwrap();
        assert_eq!(r.d20_roll, 14);
        assert_eq!(r.advantage_rolls, None);
        // dice untouched
        assert_eq!(dice.d20(), 2);
    }

    #[test]
    fn modifier_formatting() {
        assert_eq!(format_modifier(3), "+3");
        assert_eq!(format_modifier(0), "+0");
        assert_eq!(format_modifier(-2), "-2");
    }

    #[test]
    fn bare_check_grades_against_dc() {
        let mut dice = Dice::from_scripted(vec![12]).unwrap();
        let res = check(
            &mut dice,
            CheckInput {
                dc: 15,
                modifier: 3,
                mode: AdvantageState::Normal,
            },
            None,
        )
        .unwrap();
        assert_eq!(res.total, 15);
        assert!(res.resolution.success);
        assert_eq!(res.resolution.outcome, Outcome::MarginalSuccess);
    }
}
