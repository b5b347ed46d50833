pub mod player;
pub mod role;
pub mod roster;

use thiserror::Error;

/// Reasons a request is rejected locally, before anything is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("every champion slot on both teams must be filled")]
    MissingChampions,

    #[error("a tier must be selected for player strategy analysis")]
    MissingTier,

    #[error("a tier subdivision (1-4) must be selected")]
    MissingSubdivision,

    #[error("league points must be entered for Master tier and above")]
    MissingPoints,
}
