// Requesting player's ranked standing, used by player strategy analysis.
//
// The form hands us a `PlayerSelection` whose fields may be unset. Validation
// turns it into a `PlayerContext`, which can only hold the standing that fits
// its tier: a subdivision below Master, a league-point score from Master up.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::role::{Role, Side};
use super::ValidationError;

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// Ranked tiers in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

impl Tier {
    pub const ALL: [Tier; 10] = [
        Tier::Iron,
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Emerald,
        Tier::Diamond,
        Tier::Master,
        Tier::Grandmaster,
        Tier::Challenger,
    ];

    /// Parse a tier name. Accepts English names (any case) and the Korean
    /// labels the analysis service uses.
    pub fn from_str_tier(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(tier) = Self::ALL.iter().find(|t| t.label() == s) {
            return Some(*tier);
        }
        match s.to_lowercase().as_str() {
            "iron" => Some(Tier::Iron),
            "bronze" => Some(Tier::Bronze),
            "silver" => Some(Tier::Silver),
            "gold" => Some(Tier::Gold),
            "platinum" => Some(Tier::Platinum),
            "emerald" => Some(Tier::Emerald),
            "diamond" => Some(Tier::Diamond),
            "master" => Some(Tier::Master),
            "grandmaster" => Some(Tier::Grandmaster),
            "challenger" => Some(Tier::Challenger),
            _ => None,
        }
    }

    /// Label sent to the analysis service.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Iron => "아이언",
            Tier::Bronze => "브론즈",
            Tier::Silver => "실버",
            Tier::Gold => "골드",
            Tier::Platinum => "플래티넘",
            Tier::Emerald => "에메랄드",
            Tier::Diamond => "다이아몬드",
            Tier::Master => "마스터",
            Tier::Grandmaster => "그랜드마스터",
            Tier::Challenger => "챌린저",
        }
    }

    /// Master, Grandmaster and Challenger: ranked by points, not subdivision.
    pub fn is_apex(&self) -> bool {
        matches!(self, Tier::Master | Tier::Grandmaster | Tier::Challenger)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Subdivision / league points
// ---------------------------------------------------------------------------

/// Division within a non-apex tier, 1 (highest) through 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Subdivision(u8);

impl Subdivision {
    pub fn new(value: u8) -> Option<Self> {
        (1..=4).contains(&value).then_some(Self(value))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

/// League-point score for apex tiers, 0 through 3000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LeaguePoints(u16);

impl LeaguePoints {
    pub const MAX: u16 = 3000;

    pub fn new(value: u32) -> Option<Self> {
        u16::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .map(Self)
    }

    pub fn get(&self) -> u16 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Selection and validated context
// ---------------------------------------------------------------------------

/// Raw, possibly incomplete player details as entered on the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSelection {
    pub tier: Option<Tier>,
    pub subdivision: Option<Subdivision>,
    pub points: Option<LeaguePoints>,
    pub role: Role,
    pub side: Side,
}

impl Default for PlayerSelection {
    fn default() -> Self {
        Self {
            tier: None,
            subdivision: None,
            points: None,
            role: Role::Top,
            side: Side::Blue,
        }
    }
}

/// How a validated player is placed within their tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierStanding {
    Division(Subdivision),
    Points(LeaguePoints),
}

/// A validated player context attached to player strategy requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerContext {
    pub tier: Tier,
    pub standing: TierStanding,
    pub role: Role,
    pub side: Side,
}

impl PlayerContext {
    pub fn subdivision(&self) -> Option<Subdivision> {
        match self.standing {
            TierStanding::Division(d) => Some(d),
            TierStanding::Points(_) => None,
        }
    }

    pub fn points(&self) -> Option<LeaguePoints> {
        match self.standing {
            TierStanding::Points(p) => Some(p),
            TierStanding::Division(_) => None,
        }
    }

    /// Combined tier description, e.g. `"마스터 250LP"` or `"골드 2단계"`.
    pub fn full_tier_label(&self) -> String {
        match self.standing {
            TierStanding::Points(p) => format!("{} {}LP", self.tier.label(), p.get()),
            TierStanding::Division(d) => format!("{} {}단계", self.tier.label(), d.get()),
        }
    }
}

/// Validate a player selection, stopping at the first missing field.
///
/// Order: tier, then subdivision (below Master) or points (Master and up).
/// A value entered for the field that does not apply to the tier is dropped.
pub fn validate(selection: &PlayerSelection) -> Result<PlayerContext, ValidationError> {
    let tier = selection.tier.ok_or(ValidationError::MissingTier)?;

    let standing = if tier.is_apex() {
        TierStanding::Points(selection.points.ok_or(ValidationError::MissingPoints)?)
    } else {
        TierStanding::Division(
            selection
                .subdivision
                .ok_or(ValidationError::MissingSubdivision)?,
        )
    };

    Ok(PlayerContext {
        tier,
        standing,
        role: selection.role,
        side: selection.side,
    })
}
