// Playoff lineup optimizer entry point.
//
// Batch run:
// 1. Initialize tracing (stderr)
// 2. Load config (bracket + strategy)
// 3. Load every team's season stats
// 4. Score the pool
// 5. Run the four-round allocation
// 6. Write the text and JSON reports

use std::path::Path;

use anyhow::Context;
use tracing::info;

use playoff_optimizer::bracket::{AdvancementTable, EliminationSchedule};
use playoff_optimizer::config;
use playoff_optimizer::lineup::engine::Allocator;
use playoff_optimizer::lineup::pool::PlayerPool;
use playoff_optimizer::lineup::slots::expand_template;
use playoff_optimizer::report;
use playoff_optimizer::stats;
use playoff_optimizer::valuation;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Playoff lineup optimizer starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {} teams, {} slot groups",
        config.teams.len(),
        config.lineup.len()
    );

    let table = AdvancementTable::from_teams(&config.teams);
    let schedule = EliminationSchedule::from_predictions(&table, &config.predictions);

    // 3. Load every team's season stats
    let mut all_stats = Vec::new();
    for team in &config.teams {
        let team_stats = stats::load_team_stats(Path::new(&team.stats), &team.code)
            .with_context(|| format!("failed to load stats for {}", team.code))?;
        info!("Loaded {} players for {}", team_stats.len(), team.code);
        all_stats.extend(team_stats);
    }

    // 4. Score the pool
    let players = valuation::score_pool(all_stats, &table, &config.scoring, &config.pool);
    if players.is_empty() {
        anyhow::bail!("no usable players loaded from any team");
    }

    // 5. Run the four-round allocation
    let template = expand_template(&config.lineup);
    let pool = PlayerPool::new(players, table.bye_teams());
    let mut allocator = Allocator::new(&table, &config.conservation, template, schedule, pool);
    let lineups = allocator.run();

    // 6. Write the reports
    let generated_at = chrono::Utc::now();
    let text = report::render_text(&lineups, generated_at);
    std::fs::write(&config.output.text, &text)
        .with_context(|| format!("failed to write {}", config.output.text))?;
    let json = report::render_json(&lineups, generated_at)
        .context("failed to serialize JSON report")?;
    std::fs::write(&config.output.json, json)
        .with_context(|| format!("failed to write {}", config.output.json))?;

    let total_projected: f64 = lineups.iter().map(|l| l.total_projected).sum();
    let players_used: usize = lineups.iter().map(|l| l.assignments.len()).sum();
    info!(
        "Done: {} players used, {:.1} projected points across all weeks; \
         results in {} and {}",
        players_used, total_projected, config.output.text, config.output.json
    );

    Ok(())
}

/// Initialize tracing to stderr, leaving stdout for anything piping the
/// report files.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("playoff_optimizer=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
