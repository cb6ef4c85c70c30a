// Integration tests for the playoff lineup optimizer.
//
// These tests exercise the full system end-to-end using the library
// crate's public API: fixture stat CSVs are ingested, scored, and run
// through the four-round allocation, and the results are checked against
// the properties the optimizer guarantees (one-time use, bye and
// elimination enforcement, deterministic greedy fills).

use std::collections::HashSet;
use std::path::Path;

use chrono::TimeZone;

use playoff_optimizer::bracket::{AdvancementTable, EliminationSchedule, Round};
use playoff_optimizer::config::{
    AdvancementConfig, ConservationRules, PoolRules, PredictionsConfig, ScoringRules,
    SlotGroupConfig, TeamConfig,
};
use playoff_optimizer::lineup::engine::{Allocator, RoundLineup};
use playoff_optimizer::lineup::pool::PlayerPool;
use playoff_optimizer::lineup::slots::expand_template;
use playoff_optimizer::report;
use playoff_optimizer::stats::{self, PlayerStats};
use playoff_optimizer::valuation;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the project root, which is the cwd
/// for `cargo test`).
const FIXTURES: &str = "tests/fixtures";

fn fixture_team(
    code: &str,
    name: &str,
    seed: u32,
    bye: bool,
    file: &str,
    adv: [f64; 4],
) -> TeamConfig {
    TeamConfig {
        code: code.into(),
        name: name.into(),
        conference: "TEST".into(),
        seed,
        first_round_bye: bye,
        stats: format!("{FIXTURES}/{file}"),
        advancement: AdvancementConfig {
            wildcard: adv[0],
            divisional: adv[1],
            championship: adv[2],
            superbowl: adv[3],
        },
    }
}

/// Build the three-team fixture bracket -- single source of truth for the
/// teams used across these tests: a byed contender, a mid-tier survivor,
/// and a wild-card loser.
fn fixture_teams() -> Vec<TeamConfig> {
    vec![
        fixture_team(
            "DEN",
            "Denver Broncos",
            1,
            true,
            "denver_broncos.csv",
            [1.0, 0.70, 0.55, 0.35],
        ),
        fixture_team(
            "LAR",
            "Los Angeles Rams",
            5,
            false,
            "los_angeles_rams.csv",
            [0.65, 0.42, 0.23, 0.13],
        ),
        fixture_team(
            "CAR",
            "Carolina Panthers",
            4,
            false,
            "carolina_panthers.csv",
            [0.35, 0.0, 0.0, 0.0],
        ),
    ]
}

fn fixture_predictions() -> PredictionsConfig {
    PredictionsConfig {
        wildcard_losers: vec!["CAR".into()],
        championship_cutoff: 0.18,
        superbowl_cutoff: 0.08,
    }
}

fn ppr_scoring() -> ScoringRules {
    ScoringRules {
        passing_yard: 0.04,
        passing_td: 4.0,
        interception: -2.0,
        rushing_yard: 0.1,
        rushing_td: 6.0,
        reception: 1.0,
        receiving_yard: 0.1,
        receiving_td: 6.0,
        sack: 1.0,
        defensive_interception: 2.0,
        fumble_forced: 1.0,
        fumble_recovered: 2.0,
        te_reception_premium: 0.5,
    }
}

fn conservation_rules() -> ConservationRules {
    ConservationRules {
        elite_projection: 15.0,
        strong_sb_probability: 0.25,
        wildcard_multiplier: 0.40,
        divisional_multiplier: 0.65,
    }
}

fn pool_rules() -> PoolRules {
    PoolRules {
        min_projection: 5.0,
        always_keep: vec!["QB".into(), "TE".into()],
    }
}

fn slot_group(label: &str, positions: &[&str], min: usize, max: usize) -> SlotGroupConfig {
    SlotGroupConfig {
        label: label.into(),
        positions: positions.iter().map(|s| s.to_string()).collect(),
        min,
        max,
    }
}

/// One seat per position plus a flex and the optional special slots.
fn fixture_lineup() -> Vec<SlotGroupConfig> {
    vec![
        slot_group("QB", &["QB"], 1, 1),
        slot_group("RB", &["RB"], 1, 1),
        slot_group("WR", &["WR"], 1, 1),
        slot_group("TE", &["TE"], 1, 1),
        slot_group("FLEX", &["RB", "WR", "TE"], 0, 1),
        slot_group("K", &["K"], 0, 1),
        slot_group("DEF", &["DEF"], 0, 1),
    ]
}

/// Load every fixture team's stats, in config order.
fn load_fixture_stats(teams: &[TeamConfig]) -> Vec<PlayerStats> {
    let mut all = Vec::new();
    for team in teams {
        let team_stats = stats::load_team_stats(Path::new(&team.stats), &team.code)
            .expect("fixture CSVs should load");
        all.extend(team_stats);
    }
    all
}

/// Run the full pipeline against the fixture bracket and return the four
/// round lineups.
fn run_full_allocation() -> Vec<RoundLineup> {
    let teams = fixture_teams();
    let table = AdvancementTable::from_teams(&teams);
    let schedule = EliminationSchedule::from_predictions(&table, &fixture_predictions());

    let all_stats = load_fixture_stats(&teams);
    let players = valuation::score_pool(all_stats, &table, &ppr_scoring(), &pool_rules());

    let rules = conservation_rules();
    let pool = PlayerPool::new(players, table.bye_teams());
    let mut allocator = Allocator::new(
        &table,
        &rules,
        expand_template(&fixture_lineup()),
        schedule,
        pool,
    );
    allocator.run()
}

fn slot_player<'l>(lineup: &'l RoundLineup, slot: &str) -> &'l str {
    &lineup
        .assignments
        .iter()
        .find(|a| a.slot == slot)
        .unwrap_or_else(|| panic!("slot {slot} not filled in {}", lineup.round))
        .player
}

// ===========================================================================
// Ingestion and scoring
// ===========================================================================

#[test]
fn fixture_csvs_ingest_and_score() {
    let teams = fixture_teams();
    let table = AdvancementTable::from_teams(&teams);
    let all_stats = load_fixture_stats(&teams);

    // The linebacker row is skipped at ingest; the zero-games player and
    // the below-floor receiver are dropped at scoring. The kicker's blank
    // stat line scores 0.0 and also falls below the floor.
    let players = valuation::score_pool(all_stats, &table, &ppr_scoring(), &pool_rules());
    let names: Vec<&str> = players.iter().map(|p| p.stats.name.as_str()).collect();

    assert!(names.contains(&"Matthew Stafford"));
    assert!(names.contains(&"Rams D/ST"));
    assert!(!names.contains(&"Zero Games Guy"));
    assert!(!names.contains(&"Depth Receiver"));
    assert!(!names.contains(&"Joshua Karty"));
    assert!(!names.contains(&"Ernest Jones"));
    assert_eq!(players.len(), 13);

    let stafford = players
        .iter()
        .find(|p| p.stats.name == "Matthew Stafford")
        .unwrap();
    // 4000 * 0.04 + 14 * 4 - 5 * 2 = 206 over 10 games.
    assert!((stafford.base_projection - 20.6).abs() < 1e-9);
    assert!((stafford.sb_probability - 0.13).abs() < f64::EPSILON);

    let higbee = players
        .iter()
        .find(|p| p.stats.name == "Tyler Higbee")
        .unwrap();
    // 12.3 from the stat line plus the 0.5/reception tight end premium.
    assert!((higbee.base_projection - 14.8).abs() < 1e-9);
}

// ===========================================================================
// The wild card round
// ===========================================================================

#[test]
fn wildcard_round_fills_from_playing_teams() {
    let lineups = run_full_allocation();
    let wildcard = &lineups[0];
    assert_eq!(wildcard.round, Round::WildCard);

    // Byed Denver players contribute nothing in the wild card round.
    for a in &wildcard.assignments {
        assert_ne!(a.team, "DEN", "{} fielded during Denver's bye", a.player);
    }

    // The Stafford scenario: best available quarterback at 20.6 * 0.65.
    assert_eq!(slot_player(wildcard, "QB"), "Matthew Stafford");
    let qb = wildcard.assignments.iter().find(|a| a.slot == "QB").unwrap();
    assert!((qb.effective_value - 20.6 * 0.65).abs() < 1e-9);
    assert!((qb.probability - 0.65).abs() < f64::EPSILON);

    // Rams starters outrank Panthers starters at every position.
    assert_eq!(slot_player(wildcard, "RB"), "Kyren Williams");
    assert_eq!(slot_player(wildcard, "WR"), "Puka Nacua");
    assert_eq!(slot_player(wildcard, "TE"), "Tyler Higbee");

    // Flex takes the best leftover skill player; the defense fills its
    // optional seat; no kicker survived the pool floor.
    assert_eq!(slot_player(wildcard, "FLEX"), "Chuba Hubbard");
    assert_eq!(slot_player(wildcard, "DEF"), "Rams D/ST");
    assert!(wildcard.assignments.iter().all(|a| a.slot != "K"));
    assert!(!wildcard.incomplete());
}

// ===========================================================================
// Conservation across rounds
// ===========================================================================

#[test]
fn divisional_round_applies_conservation_penalty() {
    let lineups = run_full_allocation();
    let divisional = &lineups[1];
    assert_eq!(divisional.round, Round::Divisional);

    // Bo Nix: elite (26.0) on a strong team (SB 0.35), divisional
    // multiplier 0.65 on top of the 0.70 advancement weight.
    assert_eq!(slot_player(divisional, "QB"), "Bo Nix");
    let qb = divisional
        .assignments
        .iter()
        .find(|a| a.slot == "QB")
        .unwrap();
    assert!((qb.effective_value - 26.0 * 0.70 * 0.65).abs() < 1e-9);
}

// ===========================================================================
// One-time use, byes, and elimination
// ===========================================================================

#[test]
fn no_player_is_used_twice() {
    let lineups = run_full_allocation();

    let mut seen = HashSet::new();
    for lineup in &lineups {
        for a in &lineup.assignments {
            assert!(
                seen.insert((a.player.clone(), a.team.clone())),
                "{} ({}) appears in more than one round",
                a.player,
                a.team
            );
        }
    }
}

#[test]
fn eliminated_panthers_never_appear_after_wildcard() {
    let lineups = run_full_allocation();

    for lineup in &lineups[1..] {
        for a in &lineup.assignments {
            assert_ne!(
                a.team, "CAR",
                "{} fielded after Carolina's elimination",
                a.player
            );
        }
    }
}

#[test]
fn exhausted_pool_yields_incomplete_rounds() {
    let lineups = run_full_allocation();

    // Three fixture teams cannot cover four rounds of required seats; the
    // late rounds run dry and are reported, not aborted.
    assert!(lineups[2].incomplete());
    assert!(lineups[3].incomplete());
    assert_eq!(lineups.len(), 4);
}

// ===========================================================================
// Determinism and reporting
// ===========================================================================

#[test]
fn reruns_are_byte_identical() {
    let first = run_full_allocation();
    let second = run_full_allocation();

    let at = chrono::Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
    assert_eq!(
        report::render_text(&first, at),
        report::render_text(&second, at)
    );
    assert_eq!(
        report::render_json(&first, at).unwrap(),
        report::render_json(&second, at).unwrap()
    );
}

#[test]
fn report_carries_round_totals_and_flags() {
    let lineups = run_full_allocation();
    let at = chrono::Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
    let text = report::render_text(&lineups, at);

    assert!(text.contains("WILD CARD ROUND LINEUP"));
    assert!(text.contains("Matthew Stafford"));
    assert!(text.contains("SUMMARY"));
    assert!(text.contains("Week-by-Week Breakdown:"));
    // The dried-up championship round is flagged in the report.
    assert!(text.contains("required slot(s) unfilled"));

    let json = report::render_json(&lineups, at).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["rounds"][0]["round"], "wildcard");
    assert_eq!(value["rounds"].as_array().unwrap().len(), 4);
}
