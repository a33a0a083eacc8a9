//! dugout demo driver.
//!
//! Stands in for the desktop presentation layer: runs a sample load pass
//! through the row classifier, seeds the league, applies a recorded
//! mutation, and undoes it.

use anyhow::Result;
use serde_json::json;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dugout::domain::{StatChangeRecord, TeamStat, UndoStack};
use dugout::services::{hydrate, InstanceBuilder, TableTag};
use dugout::AppConfig;

/// Initialize logging with RUST_LOG environment variable support
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// A small row batch in scrambled arrival order, standing in for storage
fn sample_rows(builder: &mut InstanceBuilder) {
    builder.enqueue(
        TableTag::Player,
        vec!["name".into(), "number".into(), "team".into(), "positions".into(), "hit".into(), "at_bat".into()],
        vec![json!("Ivy Okafor"), json!(12), json!("Beef Sliders"), json!(r#"["catcher"]"#), json!(14), json!(40)],
    );
    builder.enqueue(
        TableTag::Team,
        vec!["name".into(), "manager".into()],
        vec![json!("Beef Sliders"), json!("Pat Muller")],
    );
    builder.enqueue(
        TableTag::League,
        vec!["name".into(), "commissioner".into()],
        vec![json!("Sunday League"), json!("R. Ortiz")],
    );
    builder.enqueue(
        TableTag::Pitcher,
        vec!["name".into(), "number".into(), "team".into(), "positions".into(), "era".into()],
        vec![json!("Sal Moreno"), json!(21), json!("Beef Sliders"), json!(r#"["pitcher"]"#), json!("3.5")],
    );
}

fn main() -> Result<()> {
    init_logging();

    let config = AppConfig::load(None).unwrap_or_else(|e| {
        tracing::warn!("falling back to default config: {}", e);
        AppConfig::load_defaults()
    });

    // load pass: classify the batch, then seed the league
    let mut builder = InstanceBuilder::new();
    sample_rows(&mut builder);
    let instances = builder.build_all();
    tracing::info!(count = instances.len(), "classified row batch");
    let mut league = hydrate(instances, &config);

    println!("{}", league.name);
    println!("{}", league.roster.view_all());

    // a recorded mutation and its undo
    let mut undo = UndoStack::new();
    if let Some(key) = league.roster.find_team_key("Beef Sliders") {
        if let Some(team) = league.roster.team(key) {
            undo.push(StatChangeRecord::team_stat(key, team, TeamStat::GamesPlayed));
        }
        if let Some(team) = league.roster.team_mut(key) {
            team.set_games_played(3);
            println!("after mutation:  games played = {}", team.games_played);
        }
        undo.undo(&mut league.roster);
        if let Some(team) = league.roster.team(key) {
            println!("after undo:      games played = {}", team.games_played);
        }
    }

    // league-wide readers the GUI charts from
    for (team, roster, avg) in league.roster.get_all_avg() {
        println!("AVG  {team} ({roster}): {avg}");
    }
    for (team, era) in league.roster.get_team_era() {
        println!("ERA  {team}: {era}");
    }

    Ok(())
}
