use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::checks::{
    CheckResolution, PlayerRoll, ResolvedCheck, format_d20_sequence, format_modifier,
    resolve_check,
};
use crate::payload::ResolveCheckPayload;
use crate::{Character, CheckRequest, Dice};

/// File- or inline-driven description of one check to resolve.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResolveConfig {
    #[serde(default)]
    pub character_path: Option<String>,
    #[serde(default)]
    pub request_path: Option<String>,
    #[serde(default)]
    pub character: Option<Character>,
    #[serde(default)]
    pub request: Option<CheckRequest>,
    /// 0 draws from OS entropy.
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub manual_roll: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ResolveReport {
    pub request: CheckRequest,
    pub player_roll: PlayerRoll,
    pub resolution: CheckResolution,
    pub log: Vec<String>,
}

pub fn resolve(cfg: ResolveConfig) -> Result<ResolveReport> {
    let (character, request) = inputs(&cfg)?;
    let mut dice = dice_for(cfg.seed);
    let ResolvedCheck {
        player_roll,
        resolution,
    } = resolve_check(&mut dice, &character, &request, cfg.manual_roll)?;

    let mut logs = Vec::new();
    log_request(&mut logs, &request);
    log_modifier(&mut logs, &player_roll);
    log_roll(&mut logs, &player_roll, cfg.manual_roll.is_some());
    log_result(&mut logs, request.dc, &player_roll, &resolution);

    Ok(ResolveReport {
        request,
        player_roll,
        resolution,
        log: logs,
    })
}

/// Resolve and wrap the roll in the body the backend expects.
pub fn build_payload(
    cfg: ResolveConfig,
    character_id: &str,
    campaign_id: &str,
) -> Result<ResolveCheckPayload> {
    let report = resolve(cfg)?;
    Ok(ResolveCheckPayload::new(
        character_id,
        campaign_id,
        report.player_roll,
        report.request,
    ))
}

pub fn load_config(path: impl AsRef<Path>) -> Result<ResolveConfig> {
    load_structured(path.as_ref(), "config")
}

pub fn load_character(path: impl AsRef<Path>) -> Result<Character> {
    load_structured(path.as_ref(), "character")
}

pub fn load_request(path: impl AsRef<Path>) -> Result<CheckRequest> {
    let req: CheckRequest = load_structured(path.as_ref(), "check request")?;
    Ok(req.normalized())
}

fn inputs(cfg: &ResolveConfig) -> Result<(Character, CheckRequest)> {
    let character = match (&cfg.character, &cfg.character_path) {
        (Some(c), _) => c.clone(),
        (None, Some(path)) => load_character(path)?,
        (None, None) => bail!("no character given (set `character` or `character_path`)"),
    };
    let request = match (&cfg.request, &cfg.request_path) {
        (Some(r), _) => r.clone().normalized(),
        (None, Some(path)) => load_request(path)?,
        (None, None) => bail!("no check request given (set `request` or `request_path`)"),
    };
    Ok((character, request))
}

fn dice_for(seed: u64) -> Dice {
    if seed == 0 {
        Dice::from_entropy()
    } else {
        Dice::from_seed(seed)
    }
}

fn load_structured<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}: {}", what, path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let data = if is_yaml {
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse {} YAML: {}", what, path.display()))?
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse {} JSON: {}", what, path.display()))?
    };
    Ok(data)
}

fn log_request(logs: &mut Vec<String>, req: &CheckRequest) {
    let skill = req
        .skill
        .as_deref()
        .map(|s| format!(" ({})", s))
        .unwrap_or_default();
    logs.push(format!(
        "[CHECK] {}{} DC {} [{:?}] {}",
        req.ability,
        skill,
        req.dc,
        req.band(),
        req.advantage_state
    ));
    if let Some(reason) = &req.reason {
        logs.push(format!("[CHECK] reason: {}", reason));
    }
}

fn log_modifier(logs: &mut Vec<String>, roll: &PlayerRoll) {
    logs.push(format!(
        "[MOD] ability {} prof {} other {} = {}",
        format_modifier(roll.ability_modifier),
        format_modifier(roll.proficiency_bonus),
        format_modifier(roll.other_bonuses),
        format_modifier(roll.modifier)
    ));
}

fn log_roll(logs: &mut Vec<String>, roll: &PlayerRoll, manual: bool) {
    let source = if manual { "manual " } else { "" };
    logs.push(format!(
        "[ROLL] {}{}",
        source,
        format_d20_sequence(&roll.d20().raw(), roll.d20_roll)
    ));
}

fn log_result(logs: &mut Vec<String>, dc: i32, roll: &PlayerRoll, res: &CheckResolution) {
    let mark = if res.success { "✔" } else { "✖" };
    logs.push(format!(
        "[RESULT] total {} vs DC {} margin {:+} → {} {}",
        roll.total, dc, res.margin, res.outcome, mark
    ));
}
