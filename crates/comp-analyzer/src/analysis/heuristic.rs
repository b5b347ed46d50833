// Local keyword-count classifier used when the analysis service can't answer.
//
// Counts how many picks belong to each of three champion groups (tanks,
// marksmen, burst mages) and applies a fixed rule table. Only champion names
// are examined; roles are ignored. Identical input always produces identical
// output.

use crate::comp::roster::RosterEntry;

use super::Analysis;

// ---------------------------------------------------------------------------
// Keyword lists
// ---------------------------------------------------------------------------

// Matching is case-insensitive substring containment, so both the English
// and Korean client names are listed.

const TANK_KEYWORDS: &[&str] = &[
    "malphite", "ornn", "cho'gath", "chogath", "maokai", "janna", "braum", "leona", "alistar",
    "말파이트", "오른", "초가스", "마오카이", "잔나", "브라움", "레오나", "알리스타",
];

const MARKSMAN_KEYWORDS: &[&str] = &[
    "jhin", "vayne", "kai'sa", "kaisa", "ezreal", "lucian", "jinx", "aphelios", "caitlyn", "ashe",
    "진", "베인", "카이사", "이즈리얼", "루시안", "징크스", "아펠리오스", "케이틀린", "애쉬",
];

const MAGE_KEYWORDS: &[&str] = &[
    "azir", "orianna", "syndra", "leblanc", "yasuo", "zed",
    "아지르", "오리아나", "신드라", "르블랑", "야스오", "제드",
];

/// A group fires its rule once this many picks match it.
const RULE_THRESHOLD: usize = 2;

// ---------------------------------------------------------------------------
// Output text
// ---------------------------------------------------------------------------

pub const ARCHETYPE_BALANCED: &str = "balanced composition";
pub const ARCHETYPE_TANK: &str = "tank-centric composition";
pub const ARCHETYPE_MAGIC: &str = "magic-damage-centric composition";

const TANK_STRENGTHS: [&str; 2] = ["strong frontline", "excellent teamfight initiation"];
const TANK_WEAKNESSES: [&str; 2] = ["possible damage shortfall", "limited mobility"];

const MARKSMAN_STRENGTHS: [&str; 2] = ["strong late-game carry potential", "fast objective clearing"];
const MARKSMAN_WEAKNESSES: [&str; 2] = ["weak early game", "vulnerable to burst assassins"];

const MAGE_STRENGTHS: [&str; 2] = ["strong area damage", "strong mid-range poke"];
const MAGE_WEAKNESSES: [&str; 2] = ["vulnerable to magic resistance", "high mana dependency"];

pub const DEFAULT_STRENGTHS: [&str; 2] = ["balanced composition", "flexible strategic options"];
pub const DEFAULT_WEAKNESSES: [&str; 2] =
    ["no particular weakness", "situational counterplay required"];

pub const STRATEGY_TEAMFIGHT: &str = "Play around teamfights. Seizing the initiative \
     through strong engages is the key to taking control of the game.";
pub const STRATEGY_LANING: &str = "Win your lanes and grow the lead step by step. \
     Use pick-offs and split pushing to create advantages.";

pub const WIN_CONDITION_SCALING: &str = "Scale safely into the late game and set up \
     an environment where your marksmen can carry.";
pub const WIN_CONDITION_MID_GAME: &str = "Win the mid-game teamfights and close out \
     the game quickly.";

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Per-group pick counts. A pick may count toward more than one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupCounts {
    pub tanks: usize,
    pub marksmen: usize,
    pub mages: usize,
}

impl GroupCounts {
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let lowered: Vec<String> = names.iter().map(|n| n.as_ref().to_lowercase()).collect();
        GroupCounts {
            tanks: count_matches(&lowered, TANK_KEYWORDS),
            marksmen: count_matches(&lowered, MARKSMAN_KEYWORDS),
            mages: count_matches(&lowered, MAGE_KEYWORDS),
        }
    }
}

fn count_matches(names: &[String], keywords: &[&str]) -> usize {
    names
        .iter()
        .filter(|name| keywords.iter().any(|kw| name.contains(kw)))
        .count()
}

/// Classify a roster's picks. Roles are ignored.
pub fn classify(picks: &[RosterEntry]) -> Analysis {
    let names: Vec<&str> = picks.iter().map(|p| p.name.as_str()).collect();
    classify_names(names.as_slice())
}

/// Classify a list of champion names.
///
/// Rules run in a fixed order (tanks, marksmen, mages) and each may fire.
/// The mage rule replaces any archetype set by the tank rule; the marksman
/// rule never touches the archetype.
pub fn classify_names<S: AsRef<str>>(names: &[S]) -> Analysis {
    let counts = GroupCounts::from_names(names);

    let mut archetype = ARCHETYPE_BALANCED;
    let mut strengths: Vec<String> = Vec::new();
    let mut weaknesses: Vec<String> = Vec::new();

    if counts.tanks >= RULE_THRESHOLD {
        archetype = ARCHETYPE_TANK;
        extend(&mut strengths, &TANK_STRENGTHS);
        extend(&mut weaknesses, &TANK_WEAKNESSES);
    }

    if counts.marksmen >= RULE_THRESHOLD {
        extend(&mut strengths, &MARKSMAN_STRENGTHS);
        extend(&mut weaknesses, &MARKSMAN_WEAKNESSES);
    }

    if counts.mages >= RULE_THRESHOLD {
        archetype = ARCHETYPE_MAGIC;
        extend(&mut strengths, &MAGE_STRENGTHS);
        extend(&mut weaknesses, &MAGE_WEAKNESSES);
    }

    if strengths.is_empty() {
        extend(&mut strengths, &DEFAULT_STRENGTHS);
    }
    if weaknesses.is_empty() {
        extend(&mut weaknesses, &DEFAULT_WEAKNESSES);
    }

    let strategy = if counts.tanks >= RULE_THRESHOLD {
        STRATEGY_TEAMFIGHT
    } else {
        STRATEGY_LANING
    };

    let win_condition = if counts.marksmen >= RULE_THRESHOLD {
        WIN_CONDITION_SCALING
    } else {
        WIN_CONDITION_MID_GAME
    };

    Analysis {
        archetype: archetype.to_string(),
        strengths,
        weaknesses,
        strategy: strategy.to_string(),
        win_condition: win_condition.to_string(),
    }
}

fn extend(target: &mut Vec<String>, items: &[&str]) {
    target.extend(items.iter().map(|s| s.to_string()));
}
