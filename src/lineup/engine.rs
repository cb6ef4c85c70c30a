// The allocation engine.
//
// Each round moves through three phases:
//   Open    — effective values are computed for every available player
//   Filling — required seats are filled per group by descending effective
//             value, then optional/flex seats from the globally re-ranked
//             leftover pool
//   Closed  — chosen players are committed to the used set and the round's
//             assignments are emitted
//
// Assignments are never revised once a later round has begun; the greedy
// per-round fill with conservation penalties is the whole algorithm.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::{info, warn};

use crate::bracket::{AdvancementTable, Availability, EliminationSchedule, Round};
use crate::config::ConservationRules;
use crate::lineup::pool::{PlayerId, PlayerPool};
use crate::lineup::slots::Slot;
use crate::stats::Position;
use crate::valuation::conservation;

// ---------------------------------------------------------------------------
// Output records
// ---------------------------------------------------------------------------

/// One filled seat: the output record of the engine.
#[derive(Debug, Clone, Serialize)]
pub struct Assignment {
    pub slot: String,
    pub player: String,
    pub team: String,
    pub position: Position,
    pub base_projection: f64,
    /// The advancement probability the effective value was computed with.
    pub probability: f64,
    pub effective_value: f64,
}

/// One round's completed lineup.
#[derive(Debug, Clone, Serialize)]
pub struct RoundLineup {
    pub round: Round,
    /// Filled seats in template order.
    pub assignments: Vec<Assignment>,
    /// Labels of required seats no eligible player was left for.
    pub unfilled: Vec<String>,
    pub total_effective: f64,
    pub total_projected: f64,
}

impl RoundLineup {
    /// A round is incomplete when a required seat went unfilled. Reported,
    /// never fatal: the partial lineup stands.
    pub fn incomplete(&self) -> bool {
        !self.unfilled.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Round fill state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Open,
    Filling,
    Closed,
}

/// A pool entry valued for one specific round.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    id: PlayerId,
    position: Position,
    effective: f64,
    base: f64,
    probability: f64,
}

/// Ranking used everywhere seats are filled: higher effective value first,
/// then higher base projection, then stable input order.
fn rank(a: &Candidate, b: &Candidate) -> Ordering {
    b.effective
        .partial_cmp(&a.effective)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.base.partial_cmp(&a.base).unwrap_or(Ordering::Equal))
        .then_with(|| a.id.cmp(&b.id))
}

#[derive(Debug)]
struct SeatFill {
    slot: Slot,
    chosen: Option<Candidate>,
}

#[derive(Debug)]
struct RoundFill {
    round: Round,
    phase: Phase,
    candidates: Vec<Candidate>,
    seats: Vec<SeatFill>,
}

impl RoundFill {
    fn open(round: Round, template: &[Slot]) -> Self {
        RoundFill {
            round,
            phase: Phase::Open,
            candidates: Vec::new(),
            seats: template
                .iter()
                .map(|slot| SeatFill {
                    slot: slot.clone(),
                    chosen: None,
                })
                .collect(),
        }
    }

    /// Open -> Filling: value every available player for this round.
    fn compute_values(
        &mut self,
        pool: &PlayerPool,
        table: &AdvancementTable,
        rules: &ConservationRules,
    ) {
        debug_assert_eq!(self.phase, Phase::Open);

        for id in pool.available(self.round) {
            let player = pool.player(id);
            let probability = match table.availability(&player.stats.team, self.round) {
                // Byed teams are already excluded by the pool; skipping here
                // keeps the engine correct against any pool.
                Ok(Availability::Bye) => continue,
                Ok(Availability::Playing(p)) => p,
                // Unknown teams were warned about at scoring time and play
                // at probability 0 for every round.
                Err(_) => 0.0,
            };
            let effective = conservation::effective_value(
                player.base_projection,
                probability,
                player.sb_probability,
                self.round,
                rules,
            );
            self.candidates.push(Candidate {
                id,
                position: player.stats.position,
                effective,
                base: player.base_projection,
                probability,
            });
        }

        self.phase = Phase::Filling;
    }

    /// Fill seats greedily: required minimums first, in template order,
    /// each taking the best remaining eligible candidate; then the
    /// optional seats from one global re-ranking of the leftovers, each
    /// candidate dropping into the first open seat that admits its
    /// position.
    fn fill(&mut self) {
        debug_assert_eq!(self.phase, Phase::Filling);

        let mut remaining = self.candidates.clone();
        remaining.sort_by(rank);

        for seat in self.seats.iter_mut().filter(|s| s.slot.required) {
            let best = remaining
                .iter()
                .position(|c| seat.slot.positions.contains(&c.position));
            if let Some(idx) = best {
                seat.chosen = Some(remaining.remove(idx));
            }
        }

        for candidate in remaining {
            let open = self.seats.iter_mut().find(|s| {
                !s.slot.required
                    && s.chosen.is_none()
                    && s.slot.positions.contains(&candidate.position)
            });
            match open {
                Some(seat) => seat.chosen = Some(candidate),
                None => {
                    if self
                        .seats
                        .iter()
                        .all(|s| s.slot.required || s.chosen.is_some())
                    {
                        break;
                    }
                }
            }
        }
    }

    /// Filling -> Closed: commit the chosen players and emit the round's
    /// assignments. The commit is atomic at the round boundary; nothing
    /// mutates mid-fill.
    fn close(mut self, pool: &mut PlayerPool) -> RoundLineup {
        debug_assert_eq!(self.phase, Phase::Filling);
        self.phase = Phase::Closed;

        let mut assignments = Vec::new();
        let mut unfilled = Vec::new();
        let mut chosen_ids = Vec::new();

        for seat in &self.seats {
            match &seat.chosen {
                Some(candidate) => {
                    let player = pool.player(candidate.id);
                    chosen_ids.push(candidate.id);
                    assignments.push(Assignment {
                        slot: seat.slot.label.clone(),
                        player: player.stats.name.clone(),
                        team: player.stats.team.clone(),
                        position: player.stats.position,
                        base_projection: candidate.base,
                        probability: candidate.probability,
                        effective_value: candidate.effective,
                    });
                }
                None if seat.slot.required => unfilled.push(seat.slot.label.clone()),
                None => {}
            }
        }

        pool.commit(&chosen_ids);

        if !unfilled.is_empty() {
            warn!(
                "{} lineup incomplete: no eligible players left for {}",
                self.round,
                unfilled.join(", ")
            );
        }

        let total_effective = assignments.iter().map(|a| a.effective_value).sum();
        let total_projected = assignments.iter().map(|a| a.base_projection).sum();

        RoundLineup {
            round: self.round,
            assignments,
            unfilled,
            total_effective,
            total_projected,
        }
    }
}

// ---------------------------------------------------------------------------
// Allocator
// ---------------------------------------------------------------------------

/// Runs the four rounds in fixed order against a shrinking pool.
pub struct Allocator<'a> {
    table: &'a AdvancementTable,
    rules: &'a ConservationRules,
    template: Vec<Slot>,
    schedule: EliminationSchedule,
    pool: PlayerPool,
}

impl<'a> Allocator<'a> {
    pub fn new(
        table: &'a AdvancementTable,
        rules: &'a ConservationRules,
        template: Vec<Slot>,
        schedule: EliminationSchedule,
        pool: PlayerPool,
    ) -> Self {
        Allocator {
            table,
            rules,
            template,
            schedule,
            pool,
        }
    }

    /// Allocate one round: Open -> Filling -> Closed.
    pub fn allocate_round(&mut self, round: Round) -> RoundLineup {
        let mut fill = RoundFill::open(round, &self.template);
        fill.compute_values(&self.pool, self.table, self.rules);
        fill.fill();
        fill.close(&mut self.pool)
    }

    /// Run the full four-round allocation. Each round's commit and the
    /// predicted eliminations for that round happen before the next round
    /// opens.
    pub fn run(&mut self) -> Vec<RoundLineup> {
        let mut lineups = Vec::with_capacity(Round::ALL.len());

        for round in Round::ALL {
            let lineup = self.allocate_round(round);
            info!(
                "{}: {} players, {:.1} effective value{}",
                round,
                lineup.assignments.len(),
                lineup.total_effective,
                if lineup.incomplete() { " (incomplete)" } else { "" }
            );
            for team in self.schedule.losers(round) {
                self.pool.eliminate(team, round);
            }
            lineups.push(lineup);
        }

        lineups
    }

    pub fn pool(&self) -> &PlayerPool {
        &self.pool
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
