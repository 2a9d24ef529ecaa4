//! Ability-check resolution for a narrated d20 RPG.
//!
//! Given a character snapshot and a check request from the DM service, the
//! engine derives the modifier, rolls (or accepts) the d20 and grades the
//! result into one of six outcome tiers.

pub mod ability;
pub mod api;
pub mod character;
pub mod checks;
pub mod dice;
pub mod error;
pub mod payload;
pub mod request;

pub use ability::{Ability, ability_mod};
pub use character::{Character, proficiency_bonus};
pub use checks::{
    CheckInput, CheckResolution, CheckResult, D20Roll, Modifier, Outcome, PlayerRoll,
    ResolvedCheck, check, classify_outcome, compute_modifier, resolve_check, roll_d20,
};
pub use dice::Dice;
pub use error::{CheckError, RequestError};
pub use payload::ResolveCheckPayload;
pub use request::{AdvantageState, CheckRequest, DcBand};
