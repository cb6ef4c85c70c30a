// Valuation pipeline: base projections, pool admission, conservation policy.

pub mod conservation;
pub mod scoring;

use std::collections::HashSet;

use tracing::{info, warn};

use crate::bracket::AdvancementTable;
use crate::config::{PoolRules, ScoringRules};
use crate::stats::{PlayerStats, Position};

// ---------------------------------------------------------------------------
// Scored player
// ---------------------------------------------------------------------------

/// A player admitted to the allocation pool: raw stats plus the derived
/// per-game projection and the team-strength signal. Immutable; the `used`
/// state lives in the Pool Manager, not here.
#[derive(Debug, Clone)]
pub struct ScoredPlayer {
    pub stats: PlayerStats,
    pub base_projection: f64,
    /// The team's Super Bowl appearance probability; 0.0 for teams missing
    /// from the advancement table.
    pub sb_probability: f64,
}

// ---------------------------------------------------------------------------
// Pipeline entry point
// ---------------------------------------------------------------------------

/// Score every ingested player and apply the pool admission floor.
///
/// - Zero-games stat lines are invalid: logged and excluded, never scored
///   as zero.
/// - Players below the projection floor are dropped unless their position
///   is in `always_keep`.
/// - Teams missing from the advancement table get a warning once and a
///   0.0 strength signal; their players stay in the pool at probability 0
///   for every round.
///
/// Input order is preserved; it is the allocator's final tie-breaker.
pub fn score_pool(
    all_stats: Vec<PlayerStats>,
    table: &AdvancementTable,
    scoring: &ScoringRules,
    pool: &PoolRules,
) -> Vec<ScoredPlayer> {
    let always_keep: Vec<Position> = pool
        .always_keep
        .iter()
        .filter_map(|s| Position::from_str_pos(s))
        .collect();

    let mut warned_teams: HashSet<String> = HashSet::new();
    let mut players = Vec::new();
    let mut dropped_floor = 0usize;

    for stats in all_stats {
        let base_projection = match scoring::base_projection(&stats, scoring) {
            Ok(points) => points,
            Err(e) => {
                warn!("excluding player from pool: {}", e);
                continue;
            }
        };

        let keep = base_projection > pool.min_projection
            || always_keep.contains(&stats.position);
        if !keep {
            dropped_floor += 1;
            continue;
        }

        let sb_probability = match table.superbowl_probability(&stats.team) {
            Ok(p) => p,
            Err(_) => {
                if warned_teams.insert(stats.team.clone()) {
                    warn!(
                        "team '{}' is not in the advancement table; \
                         treating its players as probability 0 for every round",
                        stats.team
                    );
                }
                0.0
            }
        };

        players.push(ScoredPlayer {
            stats,
            base_projection,
            sb_probability,
        });
    }

    info!(
        "Admitted {} players to the pool ({} below the projection floor)",
        players.len(),
        dropped_floor
    );

    players
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
