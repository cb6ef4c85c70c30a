// Base projection scoring.
//
// Recomputes a player's season fantasy total from raw stat aggregates under
// the configured per-unit point values, then averages per game. Exports
// often ship a precomputed FPTS/G column; it is ignored so that scoring
// policy lives entirely in configuration.

use crate::config::ScoringRules;
use crate::stats::{PlayerStats, Position};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("player '{name}' has zero games played")]
    InvalidStats { name: String },
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Season fantasy point total for a stat line under the given rules.
pub fn season_points(stats: &PlayerStats, rules: &ScoringRules) -> f64 {
    stats.passing_yards * rules.passing_yard
        + f64::from(stats.passing_tds) * rules.passing_td
        + f64::from(stats.passing_ints) * rules.interception
        + stats.rushing_yards * rules.rushing_yard
        + f64::from(stats.rushing_tds) * rules.rushing_td
        + f64::from(stats.receptions) * rules.reception
        + stats.receiving_yards * rules.receiving_yard
        + f64::from(stats.receiving_tds) * rules.receiving_td
        + stats.sacks * rules.sack
        + f64::from(stats.defensive_ints) * rules.defensive_interception
        + f64::from(stats.fumbles_forced) * rules.fumble_forced
        + f64::from(stats.fumbles_recovered) * rules.fumble_recovered
}

/// Projected fantasy points for a single playoff game: the player's season
/// average, plus the per-reception premium for tight ends.
///
/// Fails for a zero-games stat line; such players must be excluded from
/// the pool, not scored as zero. A net-negative season line (possible with
/// interception-heavy quarterbacks) clamps to 0.0.
pub fn base_projection(stats: &PlayerStats, rules: &ScoringRules) -> Result<f64, ScoringError> {
    if stats.games_played == 0 {
        return Err(ScoringError::InvalidStats {
            name: stats.name.clone(),
        });
    }
    let games = f64::from(stats.games_played);
    let mut points = season_points(stats, rules) / games;

    if stats.position == Position::TightEnd {
        points += f64::from(stats.receptions) / games * rules.te_reception_premium;
    }

    Ok(points.max(0.0))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
