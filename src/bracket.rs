// Playoff bracket model: rounds, team advancement probabilities, and the
// predicted elimination schedule.
//
// Advancement probabilities are static configuration (Vegas-derived), not
// computed. A byed team's skipped round is a distinct Availability state,
// never a numeric probability.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::config::{PredictionsConfig, TeamConfig};

// ---------------------------------------------------------------------------
// Rounds
// ---------------------------------------------------------------------------

/// The four playoff stages, in play order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Round {
    WildCard,
    Divisional,
    Championship,
    SuperBowl,
}

impl Round {
    /// All rounds in the fixed processing order.
    pub const ALL: [Round; 4] = [
        Round::WildCard,
        Round::Divisional,
        Round::Championship,
        Round::SuperBowl,
    ];

    /// Index into a per-round vector.
    pub fn index(self) -> usize {
        match self {
            Round::WildCard => 0,
            Round::Divisional => 1,
            Round::Championship => 2,
            Round::SuperBowl => 3,
        }
    }

    /// The round that follows this one, if any.
    pub fn next(self) -> Option<Round> {
        match self {
            Round::WildCard => Some(Round::Divisional),
            Round::Divisional => Some(Round::Championship),
            Round::Championship => Some(Round::SuperBowl),
            Round::SuperBowl => None,
        }
    }

    /// Human-readable round name.
    pub fn label(self) -> &'static str {
        match self {
            Round::WildCard => "Wild Card",
            Round::Divisional => "Divisional",
            Round::Championship => "Championship",
            Round::SuperBowl => "Super Bowl",
        }
    }
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

/// Whether a team takes the field in a given round.
///
/// `Bye` means the team does not play that round at all; its players can
/// contribute no slot value and the Pool Manager excludes them outright.
/// This is intentionally not `Playing(0.0)`: a bye is a structural absence,
/// not a devaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Availability {
    Bye,
    Playing(f64),
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum BracketError {
    #[error("team '{0}' is not in the advancement table")]
    UnknownTeam(String),
}

// ---------------------------------------------------------------------------
// Advancement table
// ---------------------------------------------------------------------------

/// One team's bracket entry.
#[derive(Debug, Clone)]
pub struct TeamEntry {
    pub code: String,
    pub name: String,
    pub conference: String,
    pub seed: u32,
    pub first_round_bye: bool,
    /// Probability the team plays in each round, indexed by `Round::index()`.
    pub advancement: [f64; 4],
}

/// Static per-team advancement probabilities, preserving config order for
/// deterministic iteration.
#[derive(Debug, Clone)]
pub struct AdvancementTable {
    entries: Vec<TeamEntry>,
    by_code: HashMap<String, usize>,
}

impl AdvancementTable {
    /// Build the table from the bracket config's team list.
    pub fn from_teams(teams: &[TeamConfig]) -> Self {
        let mut entries = Vec::with_capacity(teams.len());
        let mut by_code = HashMap::with_capacity(teams.len());
        for team in teams {
            by_code.insert(team.code.clone(), entries.len());
            entries.push(TeamEntry {
                code: team.code.clone(),
                name: team.name.clone(),
                conference: team.conference.clone(),
                seed: team.seed,
                first_round_bye: team.first_round_bye,
                advancement: [
                    team.advancement.wildcard,
                    team.advancement.divisional,
                    team.advancement.championship,
                    team.advancement.superbowl,
                ],
            });
        }
        AdvancementTable { entries, by_code }
    }

    fn entry(&self, team: &str) -> Result<&TeamEntry, BracketError> {
        self.by_code
            .get(team)
            .map(|&idx| &self.entries[idx])
            .ok_or_else(|| BracketError::UnknownTeam(team.to_string()))
    }

    /// Whether a team plays in the given round, and with what probability.
    ///
    /// A byed team's Wild Card entry returns `Availability::Bye` regardless
    /// of the numeric value stored in the config table.
    pub fn availability(&self, team: &str, round: Round) -> Result<Availability, BracketError> {
        let entry = self.entry(team)?;
        if entry.first_round_bye && round == Round::WildCard {
            return Ok(Availability::Bye);
        }
        Ok(Availability::Playing(entry.advancement[round.index()]))
    }

    /// Super Bowl appearance probability, used as a static team-strength
    /// signal by the conservation policy.
    pub fn superbowl_probability(&self, team: &str) -> Result<f64, BracketError> {
        Ok(self.entry(team)?.advancement[Round::SuperBowl.index()])
    }

    /// Team codes with a first-round bye.
    pub fn bye_teams(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.first_round_bye)
            .map(|e| e.code.clone())
            .collect()
    }

    /// All entries in config order.
    pub fn entries(&self) -> &[TeamEntry] {
        &self.entries
    }

    pub fn contains(&self, team: &str) -> bool {
        self.by_code.contains_key(team)
    }
}

// ---------------------------------------------------------------------------
// Elimination schedule
// ---------------------------------------------------------------------------

/// Predicted eliminations: which round each losing team plays its last game
/// in. A team eliminated in round R is unavailable from round R+1 onward.
#[derive(Debug, Clone)]
pub struct EliminationSchedule {
    eliminated_in: HashMap<String, Round>,
    /// Team codes in config order, for deterministic iteration.
    order: Vec<String>,
}

impl EliminationSchedule {
    /// Derive the schedule from the `[predictions]` config section:
    ///
    /// 1. Teams in `wildcard_losers` are eliminated in the Wild Card round.
    /// 2. Remaining teams whose Championship-round probability is below
    ///    `championship_cutoff` are predicted to lose in the Divisional
    ///    round.
    /// 3. Remaining teams whose Super Bowl probability is below
    ///    `superbowl_cutoff` are predicted to lose in the Championship
    ///    round.
    ///
    /// Codes in `wildcard_losers` are validated against the table at config
    /// load, so lookups here cannot miss.
    pub fn from_predictions(table: &AdvancementTable, predictions: &PredictionsConfig) -> Self {
        let mut eliminated_in = HashMap::new();
        let mut order = Vec::new();

        for code in &predictions.wildcard_losers {
            if eliminated_in.insert(code.clone(), Round::WildCard).is_none() {
                order.push(code.clone());
            }
        }

        for entry in table.entries() {
            if eliminated_in.contains_key(&entry.code) {
                continue;
            }
            if entry.advancement[Round::Championship.index()] < predictions.championship_cutoff {
                eliminated_in.insert(entry.code.clone(), Round::Divisional);
                order.push(entry.code.clone());
            }
        }

        for entry in table.entries() {
            if eliminated_in.contains_key(&entry.code) {
                continue;
            }
            if entry.advancement[Round::SuperBowl.index()] < predictions.superbowl_cutoff {
                eliminated_in.insert(entry.code.clone(), Round::Championship);
                order.push(entry.code.clone());
            }
        }

        EliminationSchedule {
            eliminated_in,
            order,
        }
    }

    /// The round a team is predicted to lose in, if any.
    pub fn eliminated_in(&self, team: &str) -> Option<Round> {
        self.eliminated_in.get(team).copied()
    }

    /// Teams predicted to lose in the given round, in config order.
    pub fn losers(&self, round: Round) -> Vec<&str> {
        self.order
            .iter()
            .filter(|code| self.eliminated_in[code.as_str()] == round)
            .map(String::as_str)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
