// Configuration loading and parsing (bracket.toml, strategy.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::stats::Position;

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
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub teams: Vec<TeamConfig>,
    pub predictions: PredictionsConfig,
    pub scoring: ScoringRules,
    pub conservation: ConservationRules,
    pub pool: PoolRules,
    pub lineup: Vec<SlotGroupConfig>,
    pub output: OutputPaths,
}

// ---------------------------------------------------------------------------
// bracket.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire bracket.toml file.
#[derive(Debug, Clone, Deserialize)]
struct BracketFile {
    teams: Vec<TeamConfig>,
    predictions: PredictionsConfig,
}

/// One playoff team: identity, seeding, bye status, the path of its season
/// stats export, and its per-round advancement probabilities.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamConfig {
    pub code: String,
    pub name: String,
    pub conference: String,
    pub seed: u32,
    #[serde(default)]
    pub first_round_bye: bool,
    pub stats: String,
    pub advancement: AdvancementConfig,
}

/// Per-round advancement probabilities for one team. Values must be
/// monotonically non-increasing across rounds; a byed team's `wildcard`
/// entry is ignored (the round is a structural bye, not a game).
#[derive(Debug, Clone, Deserialize)]
pub struct AdvancementConfig {
    pub wildcard: f64,
    pub divisional: f64,
    pub championship: f64,
    pub superbowl: f64,
}

/// Predicted bracket results standing in for actual games: an explicit list
/// of wild-card losers, then probability cutoffs that decide which teams
/// fall in the Divisional and Championship rounds.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionsConfig {
    #[serde(default)]
    pub wildcard_losers: Vec<String>,
    pub championship_cutoff: f64,
    pub superbowl_cutoff: f64,
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire strategy.toml file.
#[derive(Debug, Clone, Deserialize)]
struct StrategyFile {
    scoring: ScoringRules,
    conservation: ConservationRules,
    pool: PoolRules,
    lineup: LineupSection,
    output: OutputPaths,
}

/// Per-unit point values for the scoring model. Receptions at 1.0 is
/// standard PPR; the TE premium is added on top for tight ends only.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringRules {
    pub passing_yard: f64,
    pub passing_td: f64,
    pub interception: f64,
    pub rushing_yard: f64,
    pub rushing_td: f64,
    pub reception: f64,
    pub receiving_yard: f64,
    pub receiving_td: f64,
    pub sack: f64,
    pub defensive_interception: f64,
    pub fumble_forced: f64,
    pub fumble_recovered: f64,
    pub te_reception_premium: f64,
}

/// Elite-conservation policy constants. A tunable heuristic, not a law:
/// the penalties approximate the cost of burning a Super-Bowl-bound elite
/// player in an early round without solving the true multi-period program.
#[derive(Debug, Clone, Deserialize)]
pub struct ConservationRules {
    pub elite_projection: f64,
    pub strong_sb_probability: f64,
    pub wildcard_multiplier: f64,
    pub divisional_multiplier: f64,
}

/// Pool admission floor: players below `min_projection` points per game
/// are dropped unless their position is in `always_keep`.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolRules {
    pub min_projection: f64,
    #[serde(default)]
    pub always_keep: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct LineupSection {
    slots: Vec<SlotGroupConfig>,
}

/// One lineup slot group: an allowed-position set with `min` required
/// seats and `max` total seats (`max - min` optional).
#[derive(Debug, Clone, Deserialize)]
pub struct SlotGroupConfig {
    pub label: String,
    pub positions: Vec<String>,
    pub min: usize,
    pub max: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputPaths {
    pub text: String,
    pub json: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/bracket.toml` and
/// `config/strategy.toml`, relative to the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization
/// automatically.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- bracket.toml (required) ---
    let bracket_path = config_dir.join("bracket.toml");
    let bracket_text = read_file(&bracket_path)?;
    let bracket_file: BracketFile =
        toml::from_str(&bracket_text).map_err(|e| ConfigError::ParseError {
            path: bracket_path.clone(),
            source: e,
        })?;

    // --- strategy.toml (required) ---
    let strategy_path = config_dir.join("strategy.toml");
    let strategy_text = read_file(&strategy_path)?;
    let strategy_file: StrategyFile =
        toml::from_str(&strategy_text).map_err(|e| ConfigError::ParseError {
            path: strategy_path.clone(),
            source: e,
        })?;

    let config = Config {
        teams: bracket_file.teams,
        predictions: bracket_file.predictions,
        scoring: strategy_file.scoring,
        conservation: strategy_file.conservation,
        pool: strategy_file.pool,
        lineup: strategy_file.lineup.slots,
        output: strategy_file.output,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // File already exists in config/, skip it
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working
/// directory. Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn err(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

fn check_probability(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(err(field, format!("must be between 0.0 and 1.0, got {value}")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    // Team validations
    if config.teams.is_empty() {
        return Err(err("teams", "at least one team is required"));
    }

    let mut seen_codes = std::collections::HashSet::new();
    for team in &config.teams {
        let prefix = format!("teams.{}", team.code);

        if team.code.trim().is_empty() {
            return Err(err("teams.code", "team code must not be empty"));
        }
        if !seen_codes.insert(team.code.as_str()) {
            return Err(err(&prefix, "duplicate team code"));
        }
        if team.seed == 0 {
            return Err(err(&format!("{prefix}.seed"), "must be greater than 0"));
        }

        let adv = &team.advancement;
        let rounds = [
            ("wildcard", adv.wildcard),
            ("divisional", adv.divisional),
            ("championship", adv.championship),
            ("superbowl", adv.superbowl),
        ];
        for (round, value) in rounds {
            check_probability(&format!("{prefix}.advancement.{round}"), value)?;
        }

        // Advancement must be monotonically non-increasing. For byed teams
        // the wildcard entry is a structural bye and is excluded from the
        // check.
        let chain: &[f64] = if team.first_round_bye {
            &[adv.divisional, adv.championship, adv.superbowl]
        } else {
            &[adv.wildcard, adv.divisional, adv.championship, adv.superbowl]
        };
        if chain.windows(2).any(|w| w[1] > w[0]) {
            return Err(err(
                &format!("{prefix}.advancement"),
                "probabilities must be non-increasing across rounds",
            ));
        }
    }

    // Prediction validations
    check_probability(
        "predictions.championship_cutoff",
        config.predictions.championship_cutoff,
    )?;
    check_probability(
        "predictions.superbowl_cutoff",
        config.predictions.superbowl_cutoff,
    )?;
    for code in &config.predictions.wildcard_losers {
        let team = config.teams.iter().find(|t| &t.code == code);
        match team {
            None => {
                return Err(err(
                    "predictions.wildcard_losers",
                    format!("unknown team code '{code}'"),
                ));
            }
            Some(t) if t.first_round_bye => {
                return Err(err(
                    "predictions.wildcard_losers",
                    format!("team '{code}' has a first-round bye and cannot lose in the wild card round"),
                ));
            }
            Some(_) => {}
        }
    }

    // Scoring validations: coefficients may be negative (interceptions) but
    // must be finite numbers.
    let s = &config.scoring;
    let coefficients: &[(&str, f64)] = &[
        ("scoring.passing_yard", s.passing_yard),
        ("scoring.passing_td", s.passing_td),
        ("scoring.interception", s.interception),
        ("scoring.rushing_yard", s.rushing_yard),
        ("scoring.rushing_td", s.rushing_td),
        ("scoring.reception", s.reception),
        ("scoring.receiving_yard", s.receiving_yard),
        ("scoring.receiving_td", s.receiving_td),
        ("scoring.sack", s.sack),
        ("scoring.defensive_interception", s.defensive_interception),
        ("scoring.fumble_forced", s.fumble_forced),
        ("scoring.fumble_recovered", s.fumble_recovered),
        ("scoring.te_reception_premium", s.te_reception_premium),
    ];
    for (name, val) in coefficients {
        if !val.is_finite() {
            return Err(err(name, format!("must be a finite number, got {val}")));
        }
    }

    // Conservation validations
    let c = &config.conservation;
    if c.elite_projection < 0.0 {
        return Err(err(
            "conservation.elite_projection",
            format!("must be >= 0, got {}", c.elite_projection),
        ));
    }
    check_probability("conservation.strong_sb_probability", c.strong_sb_probability)?;
    check_probability("conservation.wildcard_multiplier", c.wildcard_multiplier)?;
    check_probability("conservation.divisional_multiplier", c.divisional_multiplier)?;

    // Pool validations
    if config.pool.min_projection < 0.0 || !config.pool.min_projection.is_finite() {
        return Err(err(
            "pool.min_projection",
            format!("must be >= 0, got {}", config.pool.min_projection),
        ));
    }
    for pos in &config.pool.always_keep {
        if Position::from_str_pos(pos).is_none() {
            return Err(err(
                "pool.always_keep",
                format!("unknown position '{pos}'"),
            ));
        }
    }

    // Lineup template validations
    if config.lineup.is_empty() {
        return Err(err("lineup.slots", "at least one slot group is required"));
    }
    for group in &config.lineup {
        let prefix = format!("lineup.slots.{}", group.label);
        if group.label.trim().is_empty() {
            return Err(err("lineup.slots.label", "slot label must not be empty"));
        }
        if group.max == 0 {
            return Err(err(&format!("{prefix}.max"), "must be greater than 0"));
        }
        if group.min > group.max {
            return Err(err(
                &format!("{prefix}.min"),
                format!("min ({}) must not exceed max ({})", group.min, group.max),
            ));
        }
        if group.positions.is_empty() {
            return Err(err(
                &format!("{prefix}.positions"),
                "at least one position is required",
            ));
        }
        for pos in &group.positions {
            if Position::from_str_pos(pos).is_none() {
                return Err(err(
                    &format!("{prefix}.positions"),
                    format!("unknown position '{pos}'"),
                ));
            }
        }
    }

    // Output validations
    if config.output.text.trim().is_empty() {
        return Err(err("output.text", "path must not be empty"));
    }
    if config.output.json.trim().is_empty() {
        return Err(err("output.json", "path must not be empty"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
