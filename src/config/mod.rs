use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::error;

const DEFAULT_LOG: &str = "info";
const DEFAULT_LOG_FORMAT: &str = "pretty";

// ─── ScoringConfig ────────────────────────────────────────────────────────────

/// Priority scoring knobs (`[scoring]` in config.toml).
///
/// Weights and thresholds are tunable per install; the defaults keep scores
/// on the 0–10 scale the labels are defined over.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight of the urgency factor in the `balanced` strategy (default: 0.5).
    pub urgency_weight: f64,
    /// Weight of the importance factor in the `balanced` strategy (default: 0.5).
    pub importance_weight: f64,
    /// Score at or above which a task is labeled High (default: 7.0).
    pub high_threshold: f64,
    /// Score at or above which a task is labeled Medium (default: 4.0).
    pub medium_threshold: f64,
    /// Score added per direct dependent under `dependency_aware` (default: 1.5).
    pub dependents_weight: f64,
    /// Score added per level of the longest dependent chain under
    /// `dependency_aware` (default: 1.0).
    pub depth_weight: f64,
    /// Urgency score for tasks with no due date. Must stay above zero so an
    /// undated task never vanishes from an urgency ranking (default: 0.5).
    pub no_due_date_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            urgency_weight: 0.5,
            importance_weight: 0.5,
            high_threshold: 7.0,
            medium_threshold: 4.0,
            dependents_weight: 1.5,
            depth_weight: 1.0,
            no_due_date_score: 0.5,
        }
    }
}

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `{data_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// Log level filter string, e.g. "debug", "info,taskdeck=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default, human-readable) | "json" (structured).
    log_format: Option<String>,
    /// Scoring weights and thresholds (`[scoring]`).
    scoring: Option<ScoringConfig>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config.toml — using defaults");
            None
        }
    }
}

// ─── AppConfig ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log: String,
    /// Log output format: "pretty" (default) | "json".
    pub log_format: String,
    /// Scoring weights and label thresholds.
    pub scoring: ScoringConfig,
}

impl AppConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(data_dir: Option<PathBuf>, log: Option<String>) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        // Load TOML as the lowest-priority override layer
        let toml = load_toml(&data_dir).unwrap_or_default();

        let log = log.or(toml.log).unwrap_or_else(|| DEFAULT_LOG.to_string());

        let log_format = std::env::var("TASKDECK_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| DEFAULT_LOG_FORMAT.to_string());

        let scoring = toml.scoring.unwrap_or_default();

        Self {
            data_dir,
            log,
            log_format,
            scoring,
        }
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/taskdeck
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("taskdeck");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/taskdeck or ~/.local/share/taskdeck
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("taskdeck");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("taskdeck");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\taskdeck
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("taskdeck");
        }
    }
    // Fallback
    PathBuf::from(".taskdeck")
}

// ─── Tests ────────────────────────────────────────────────────────────────────
