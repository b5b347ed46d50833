// Validated match requests and the JSON body posted to the analysis service.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::comp::player::PlayerContext;
use crate::comp::roster::RosterEntry;

// ---------------------------------------------------------------------------
// Request model
// ---------------------------------------------------------------------------

/// What the user wants from the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Predict how the match will play out.
    Spectator,
    /// Personalised strategy for the requesting player.
    PlayerStrategy,
}

impl AnalysisMode {
    /// Purpose tag sent to the service.
    pub fn tag(&self) -> &'static str {
        match self {
            AnalysisMode::Spectator => "match_prediction_analysis",
            AnalysisMode::PlayerStrategy => "player_strategy_analysis",
        }
    }

    pub fn from_str_mode(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "spectator" | "match_prediction" | "match_prediction_analysis" => {
                Some(AnalysisMode::Spectator)
            }
            "player" | "player_strategy" | "player_strategy_analysis" => {
                Some(AnalysisMode::PlayerStrategy)
            }
            _ => None,
        }
    }
}

/// A request that has passed local validation.
///
/// Both rosters are complete, and a player context is present exactly when
/// the mode is `PlayerStrategy`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRequest {
    timestamp: DateTime<Utc>,
    blue: Vec<RosterEntry>,
    red: Vec<RosterEntry>,
    player: Option<PlayerContext>,
}

impl MatchRequest {
    pub fn spectator(blue: Vec<RosterEntry>, red: Vec<RosterEntry>, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            blue,
            red,
            player: None,
        }
    }

    pub fn player_strategy(
        blue: Vec<RosterEntry>,
        red: Vec<RosterEntry>,
        player: PlayerContext,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            blue,
            red,
            player: Some(player),
        }
    }

    pub fn mode(&self) -> AnalysisMode {
        if self.player.is_some() {
            AnalysisMode::PlayerStrategy
        } else {
            AnalysisMode::Spectator
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn blue(&self) -> &[RosterEntry] {
        &self.blue
    }

    pub fn red(&self) -> &[RosterEntry] {
        &self.red
    }

    pub fn player(&self) -> Option<&PlayerContext> {
        self.player.as_ref()
    }

    /// Build the JSON body for the analysis service.
    pub fn to_payload(&self) -> WebhookPayload {
        let tag = self.mode().tag();
        WebhookPayload {
            timestamp: self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            analysis_mode: tag,
            match_data: MatchData {
                blue_team: self.blue.iter().map(WirePick::from).collect(),
                red_team: self.red.iter().map(WirePick::from).collect(),
            },
            player_info: self.player.as_ref().map(PlayerInfo::from),
            request_type: tag,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// Body of the POST to the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub timestamp: String,
    pub analysis_mode: &'static str,
    pub match_data: MatchData,
    pub player_info: Option<PlayerInfo>,
    pub request_type: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchData {
    pub blue_team: Vec<WirePick>,
    pub red_team: Vec<WirePick>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WirePick {
    pub name: String,
    pub position: &'static str,
}

impl From<&RosterEntry> for WirePick {
    fn from(entry: &RosterEntry) -> Self {
        WirePick {
            name: entry.name.clone(),
            position: entry.role.code(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub tier: &'static str,
    pub tier_level: Option<String>,
    pub tier_points: Option<String>,
    pub position: &'static str,
    pub team: &'static str,
    pub full_tier_info: String,
}

impl From<&PlayerContext> for PlayerInfo {
    fn from(ctx: &PlayerContext) -> Self {
        PlayerInfo {
            tier: ctx.tier.label(),
            tier_level: ctx.subdivision().map(|d| d.get().to_string()),
            tier_points: ctx.points().map(|p| p.get().to_string()),
            position: ctx.role.code(),
            team: ctx.side.code(),
            full_tier_info: ctx.full_tier_label(),
        }
    }
}
