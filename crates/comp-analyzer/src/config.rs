// Configuration loading (analyzer.toml) and match sheet parsing.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::comp::player::{LeaguePoints, PlayerSelection, Subdivision, Tier};
use crate::comp::role::{Role, Side};
use crate::comp::roster::{Roster, ROSTER_SIZE};
use crate::remote::payload::AnalysisMode;

/// Environment variable that overrides `remote.endpoint`.
pub const ENDPOINT_ENV_VAR: &str = "COMP_ANALYZER_WEBHOOK_URL";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// analyzer.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub remote: RemoteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteConfig {
    /// Webhook URL of the analysis service. Empty means not configured.
    #[serde(default)]
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            log_dir: default_log_dir(),
        }
    }
}

fn default_log_filter() -> String {
    "comp_analyzer=info,warn".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/analyzer.toml` relative to `base_dir`, applying
/// `endpoint_override` (if non-empty) in place of `remote.endpoint`.
///
/// This is the lower-level primitive: it neither copies defaults nor reads
/// the environment. Prefer `load_config()`.
pub fn load_config_from(
    base_dir: &Path,
    endpoint_override: Option<&str>,
) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("analyzer.toml");
    let text = read_file(&path)?;
    let mut config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    if let Some(endpoint) = endpoint_override.map(str::trim).filter(|e| !e.is_empty()) {
        config.remote.endpoint = endpoint.to_string();
    }
    config.remote.endpoint = config.remote.endpoint.trim().to_string();

    validate(&config)?;

    Ok(config)
}

/// Seed `config/` from the shipped `defaults/` directory.
///
/// Each default is copied only when `config/` lacks a file of that name;
/// existing files are left untouched and `*.example` templates are skipped.
/// Returns the paths that were written. A missing `defaults/` is fine as long
/// as `config/` exists.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() {
        if config_dir.is_dir() {
            return Ok(Vec::new());
        }
        return Err(seed_error(format!(
            "no defaults/ or config/ directory under {}",
            base_dir.display()
        )));
    }

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| seed_error(format!("cannot create {}: {e}", config_dir.display())))?;

    let entries = std::fs::read_dir(&defaults_dir)
        .map_err(|e| seed_error(format!("cannot list {}: {e}", defaults_dir.display())))?;

    let mut seeded = Vec::new();
    for entry in entries {
        let source = entry
            .map_err(|e| seed_error(format!("cannot list {}: {e}", defaults_dir.display())))?
            .path();
        let Some(name) = source.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !source.is_file() || name.ends_with(".example") {
            continue;
        }

        let target = config_dir.join(name);
        if target.exists() {
            continue;
        }
        std::fs::copy(&source, &target).map_err(|e| {
            seed_error(format!("cannot copy {} to {}: {e}", source.display(), target.display()))
        })?;
        seeded.push(target);
    }

    Ok(seeded)
}

fn seed_error(message: String) -> ConfigError {
    ConfigError::DefaultsCopyError { message }
}

/// Load config relative to the current working directory, seeding missing
/// files from `defaults/` and honouring `COMP_ANALYZER_WEBHOOK_URL`.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    let endpoint_override = std::env::var(ENDPOINT_ENV_VAR).ok();
    load_config_from(&cwd, endpoint_override.as_deref())
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let endpoint = &config.remote.endpoint;
    if !endpoint.is_empty() && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
    {
        return Err(ConfigError::ValidationError {
            field: "remote.endpoint".into(),
            message: format!("must start with http:// or https://, got {endpoint:?}"),
        });
    }

    if config.logging.filter.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.filter".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Match sheet
// ---------------------------------------------------------------------------

/// Raw deserialization target for a match sheet file.
#[derive(Debug, Clone, Deserialize)]
struct MatchSheetFile {
    #[serde(default = "default_mode")]
    mode: String,
    #[serde(default)]
    blue: Vec<String>,
    #[serde(default)]
    red: Vec<String>,
    #[serde(default)]
    player: Option<PlayerSheet>,
}

fn default_mode() -> String {
    "spectator".to_string()
}

#[derive(Debug, Clone, Deserialize)]
struct PlayerSheet {
    #[serde(default)]
    tier: Option<String>,
    #[serde(default)]
    subdivision: Option<u8>,
    #[serde(default)]
    points: Option<u32>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    side: Option<String>,
}

/// A parsed match sheet: the form values for one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSheet {
    pub mode: AnalysisMode,
    pub blue: Roster,
    pub red: Roster,
    pub player: PlayerSelection,
}

/// Read a match sheet from a TOML file.
pub fn load_match_sheet(path: &Path) -> Result<MatchSheet, ConfigError> {
    let text = read_file(path)?;
    parse_match_sheet(&text, path)
}

/// Parse match sheet TOML. `path` is used for error reporting only.
///
/// Blank or missing names are kept as blank slots so the request fails
/// roster validation later, as an incomplete form would. Unparseable values
/// (unknown mode, role or side, more than five names) are rejected here.
/// An unknown tier or out-of-range subdivision/points counts as not entered.
pub fn parse_match_sheet(text: &str, path: &Path) -> Result<MatchSheet, ConfigError> {
    let file: MatchSheetFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mode = AnalysisMode::from_str_mode(&file.mode).ok_or_else(|| {
        ConfigError::ValidationError {
            field: "mode".into(),
            message: format!("expected \"spectator\" or \"player_strategy\", got {:?}", file.mode),
        }
    })?;

    let blue = roster_from_sheet("blue", &file.blue)?;
    let red = roster_from_sheet("red", &file.red)?;

    let mut player = PlayerSelection::default();
    if let Some(sheet) = file.player {
        player.tier = sheet.tier.as_deref().and_then(Tier::from_str_tier);
        player.subdivision = sheet.subdivision.and_then(Subdivision::new);
        player.points = sheet.points.and_then(LeaguePoints::new);
        if let Some(role) = sheet.role {
            player.role = Role::from_str_role(&role).ok_or_else(|| ConfigError::ValidationError {
                field: "player.role".into(),
                message: format!("unknown role {role:?}"),
            })?;
        }
        if let Some(side) = sheet.side {
            player.side = Side::from_str_side(&side).ok_or_else(|| ConfigError::ValidationError {
                field: "player.side".into(),
                message: format!("expected \"blue\" or \"red\", got {side:?}"),
            })?;
        }
    }

    Ok(MatchSheet {
        mode,
        blue,
        red,
        player,
    })
}

fn roster_from_sheet(field: &str, names: &[String]) -> Result<Roster, ConfigError> {
    Roster::from_names(names).ok_or_else(|| ConfigError::ValidationError {
        field: field.to_string(),
        message: format!("at most {ROSTER_SIZE} names allowed, got {}", names.len()),
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
