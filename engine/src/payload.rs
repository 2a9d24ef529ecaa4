use serde::{Deserialize, Serialize};

use crate::checks::{CheckResolution, PlayerRoll};
use crate::request::CheckRequest;

/// Body submitted to the backend's `POST /resolve-check` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResolveCheckPayload {
    pub character_id: String,
    pub campaign_id: String,
    pub player_roll: PlayerRoll,
    pub check_request: CheckRequest,
}

impl ResolveCheckPayload {
    pub fn new(
        character_id: impl Into<String>,
        campaign_id: impl Into<String>,
        player_roll: PlayerRoll,
        check_request: CheckRequest,
    ) -> Self {
        Self {
            character_id: character_id.into(),
            campaign_id: campaign_id.into(),
            player_roll,
            check_request,
        }
    }

    /// Recompute the graded result from the submitted roll.
    pub fn resolution(&self) -> CheckResolution {
        CheckResolution::derive(self.check_request.dc, &self.player_roll)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
