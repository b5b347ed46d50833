// Team composition assessment model.

pub mod heuristic;
pub mod reconcile;

use serde::{Deserialize, Serialize};

/// A structured composition assessment.
///
/// Field names follow the analysis service's JSON: the archetype travels as
/// `teamComp` (`archetype` is accepted too).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    #[serde(rename = "teamComp", alias = "archetype")]
    pub archetype: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub strategy: String,
    pub win_condition: String,
}

impl Analysis {
    /// Whether both the strength and weakness lists are non-empty.
    pub fn is_populated(&self) -> bool {
        !self.strengths.is_empty() && !self.weaknesses.is_empty()
    }
}
