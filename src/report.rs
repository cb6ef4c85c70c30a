// Result rendering.
//
// Produces the fixed-width text report the optimizer has always written
// (`optimal_lineups.txt`) and a JSON export of the same assignment data.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::lineup::engine::RoundLineup;

const RULE: &str =
    "================================================================================";
const THIN_RULE: &str =
    "--------------------------------------------------------------------------------";

// ---------------------------------------------------------------------------
// Text report
// ---------------------------------------------------------------------------

/// Render the full four-round report as display text.
pub fn render_text(lineups: &[RoundLineup], generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    let mut push = |line: &str| {
        out.push_str(line);
        out.push('\n');
    };

    push(RULE);
    push("PLAYOFF FANTASY LINEUP OPTIMIZER RESULTS");
    push(RULE);
    push("");
    push(&format!(
        "Generated: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    push("");
    push("STRATEGY:");
    push("- PPR scoring with a tight end reception premium");
    push("- Each player can only be used once");
    push("- Maximize total points across all playoff weeks");
    push("- Weight by team advancement probabilities");
    push("- Save elite players on Super Bowl contenders for later rounds");
    push("");

    for lineup in lineups {
        push(RULE);
        push(&format!("{} ROUND LINEUP", lineup.round.label().to_uppercase()));
        push(RULE);
        push("");

        for a in &lineup.assignments {
            push(&format!(
                "{:<5} | {:<25} | {:<4} | {:<3} | Proj: {:>5.1} | Prob: {:>3.0}% | Value: {:>5.1}",
                a.slot,
                a.player,
                a.team,
                a.position.display_str(),
                a.base_projection,
                a.probability * 100.0,
                a.effective_value,
            ));
        }
        for label in &lineup.unfilled {
            push(&format!("{:<5} | {:<25} |", label, "EMPTY"));
        }

        push(THIN_RULE);
        push(&format!(
            "Total Projected Points: {:.1}",
            lineup.total_projected
        ));
        push(&format!(
            "Total Effective Value:  {:.1}",
            lineup.total_effective
        ));
        if lineup.incomplete() {
            push(&format!(
                "!! {} required slot(s) unfilled: {}",
                lineup.unfilled.len(),
                lineup.unfilled.join(", ")
            ));
        }
        push("");
    }

    let total_projected: f64 = lineups.iter().map(|l| l.total_projected).sum();
    let players_used: usize = lineups.iter().map(|l| l.assignments.len()).sum();

    push(RULE);
    push("SUMMARY");
    push(RULE);
    push("");
    push(&format!(
        "Total Projected Points Across All Weeks: {total_projected:.1}"
    ));
    push(&format!("Players Used: {players_used}"));
    push("");
    push("Week-by-Week Breakdown:");
    for lineup in lineups {
        push(&format!(
            "{:<15} | {:>6.1} points",
            lineup.round.label(),
            lineup.total_projected
        ));
    }

    out
}

// ---------------------------------------------------------------------------
// JSON report
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    generated_at: String,
    total_projected: f64,
    total_effective: f64,
    players_used: usize,
    rounds: &'a [RoundLineup],
}

/// Render the same report data as pretty-printed JSON.
pub fn render_json(
    lineups: &[RoundLineup],
    generated_at: DateTime<Utc>,
) -> serde_json::Result<String> {
    let doc = ReportDocument {
        generated_at: generated_at.to_rfc3339(),
        total_projected: lineups.iter().map(|l| l.total_projected).sum(),
        total_effective: lineups.iter().map(|l| l.total_effective).sum(),
        players_used: lineups.iter().map(|l| l.assignments.len()).sum(),
        rounds: lineups,
    };
    serde_json::to_string_pretty(&doc)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
