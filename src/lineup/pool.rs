// The one-time-use player pool.
//
// Sole owner of the `used` set and of team elimination state. Players are
// immutable once loaded; the pool mutates only at round boundaries, when
// the allocator commits a closed round's assignments and applies the
// predicted eliminations.

use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::bracket::Round;
use crate::valuation::ScoredPlayer;

/// Stable identity of a player: its input-order index into the pool.
pub type PlayerId = usize;

#[derive(Debug, Clone)]
pub struct PlayerPool {
    players: Vec<ScoredPlayer>,
    used: Vec<bool>,
    /// Teams whose players sit out the Wild Card round entirely.
    byes: HashSet<String>,
    /// Round each eliminated team played its last game in. Players become
    /// unavailable the round after; the marking never moves later.
    eliminated: HashMap<String, Round>,
}

impl PlayerPool {
    pub fn new(players: Vec<ScoredPlayer>, bye_teams: Vec<String>) -> Self {
        let used = vec![false; players.len()];
        PlayerPool {
            players,
            used,
            byes: bye_teams.into_iter().collect(),
            eliminated: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn player(&self, id: PlayerId) -> &ScoredPlayer {
        &self.players[id]
    }

    pub fn is_used(&self, id: PlayerId) -> bool {
        self.used[id]
    }

    pub fn used_count(&self) -> usize {
        self.used.iter().filter(|&&u| u).count()
    }

    /// Players that can be fielded in the given round: not yet used, team
    /// not eliminated before the round, and not sitting out a bye.
    pub fn available(&self, round: Round) -> Vec<PlayerId> {
        (0..self.players.len())
            .filter(|&id| {
                if self.used[id] {
                    return false;
                }
                let team = self.players[id].stats.team.as_str();
                if round == Round::WildCard && self.byes.contains(team) {
                    return false;
                }
                match self.eliminated.get(team) {
                    Some(&lost_in) => round <= lost_in,
                    None => true,
                }
            })
            .collect()
    }

    /// Mark a team as playing its last game in `round`. Monotone and
    /// irreversible: a team already eliminated in an earlier round stays
    /// eliminated there.
    pub fn eliminate(&mut self, team: &str, round: Round) {
        match self.eliminated.get(team) {
            Some(&existing) if existing <= round => {}
            _ => {
                info!("{} eliminated in the {} round", team, round);
                self.eliminated.insert(team.to_string(), round);
            }
        }
    }

    /// Commit a closed round's choices: mark every chosen player used.
    pub fn commit(&mut self, ids: &[PlayerId]) {
        for &id in ids {
            debug_assert!(!self.used[id], "player {id} committed twice");
            self.used[id] = true;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{PlayerStats, Position};

    fn player(name: &str, team: &str) -> ScoredPlayer {
        ScoredPlayer {
            stats: PlayerStats {
                name: name.into(),
                team: team.into(),
                position: Position::WideReceiver,
                games_played: 10,
                passing_yards: 0.0,
                passing_tds: 0,
                passing_ints: 0,
                rushing_yards: 0.0,
                rushing_tds: 0,
                receptions: 50,
                receiving_yards: 700.0,
                receiving_tds: 5,
                sacks: 0.0,
                defensive_ints: 0,
                fumbles_forced: 0,
                fumbles_recovered: 0,
            },
            base_projection: 12.0,
            sb_probability: 0.10,
        }
    }

    fn names(pool: &PlayerPool, ids: &[PlayerId]) -> Vec<String> {
        ids.iter()
            .map(|&id| pool.player(id).stats.name.clone())
            .collect()
    }

    // -- Used players never reappear --

    #[test]
    fn committed_players_leave_the_pool() {
        let mut pool = PlayerPool::new(vec![player("A", "LAR"), player("B", "LAR")], vec![]);
        assert_eq!(pool.available(Round::WildCard).len(), 2);

        pool.commit(&[0]);
        assert_eq!(names(&pool, &pool.available(Round::WildCard)), vec!["B"]);
        assert_eq!(names(&pool, &pool.available(Round::SuperBowl)), vec!["B"]);
        assert_eq!(pool.used_count(), 1);
    }

    // -- Bye teams sit out the wild card round only --

    #[test]
    fn bye_team_excluded_from_wildcard_only() {
        let pool = PlayerPool::new(
            vec![player("Byed", "DEN"), player("Playing", "LAR")],
            vec!["DEN".into()],
        );
        assert_eq!(names(&pool, &pool.available(Round::WildCard)), vec!["Playing"]);
        assert_eq!(
            names(&pool, &pool.available(Round::Divisional)),
            vec!["Byed", "Playing"]
        );
    }

    // -- Elimination takes effect the following round --

    #[test]
    fn eliminated_team_available_through_its_last_round() {
        let mut pool = PlayerPool::new(vec![player("Loser", "LAC")], vec![]);
        pool.eliminate("LAC", Round::WildCard);

        // Still playing in the round it loses.
        assert_eq!(pool.available(Round::WildCard).len(), 1);
        // Gone from every later round.
        assert!(pool.available(Round::Divisional).is_empty());
        assert!(pool.available(Round::Championship).is_empty());
        assert!(pool.available(Round::SuperBowl).is_empty());
    }

    // -- Elimination is monotone and irreversible --

    #[test]
    fn elimination_never_moves_later() {
        let mut pool = PlayerPool::new(vec![player("Loser", "LAC")], vec![]);
        pool.eliminate("LAC", Round::WildCard);
        pool.eliminate("LAC", Round::Championship);

        assert!(pool.available(Round::Divisional).is_empty());
    }

    #[test]
    fn earlier_elimination_overrides_later() {
        let mut pool = PlayerPool::new(vec![player("Loser", "NE")], vec![]);
        pool.eliminate("NE", Round::Championship);
        pool.eliminate("NE", Round::WildCard);

        assert!(pool.available(Round::Divisional).is_empty());
    }

    // -- Available preserves input order --

    #[test]
    fn available_preserves_input_order() {
        let pool = PlayerPool::new(
            vec![player("C", "LAR"), player("A", "LAR"), player("B", "LAR")],
            vec![],
        );
        assert_eq!(
            names(&pool, &pool.available(Round::WildCard)),
            vec!["C", "A", "B"]
        );
    }
}
