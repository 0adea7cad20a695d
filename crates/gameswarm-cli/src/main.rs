//! gameswarm - swarm harness CLI
//!
//! Selects an agent, resolves the game list from the remote service,
//! runs the swarm as a background task, and supervises it in the
//! foreground until it finishes or an interrupt arrives. Every
//! terminal path converges on the orchestrator's idempotent cleanup,
//! so the scorecard is closed exactly once and its final report is
//! logged before exit.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info, Level};

use gameswarm_core::{
    default_registry, filter_games, init_tracing, recorder, GameService, HttpGameService,
    ShutdownController, Swarm, SwarmConfig, RECORDING_SUFFIX,
};

#[derive(Parser)]
#[command(name = "gameswarm")]
#[command(version = gameswarm_core::VERSION)]
#[command(about = "Run an agent swarm against a remote game service", long_about = None)]
struct Cli {
    /// Agent to run: a policy name, or a recording file for playback
    #[arg(short, long, value_name = "AGENT")]
    agent: Option<String>,

    /// Restrict to games whose id starts with any of these
    /// comma-separated prefixes
    #[arg(short, long, value_name = "FILTER")]
    game: Option<String>,

    /// Comma-separated tags attached to the scorecard
    /// (e.g. 'experiment,v1.0')
    #[arg(short, long)]
    tags: Option<String>,

    /// List all available recording files and exit
    #[arg(long)]
    list_recordings: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// How long an interrupted run gets to notice the terminal state and
/// publish its in-flight trace before the process gives up on it.
const INTERRUPT_JOIN_GRACE: Duration = Duration::from_secs(5);

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json, level);

    let mut config = SwarmConfig::from_env();
    if let Some(tags) = &cli.tags {
        config = config.with_tags(split_csv(tags));
    }

    let registry = default_registry(&config).context("failed to assemble agent registry")?;

    if cli.list_recordings {
        let recordings = registry.playback_ids();
        println!("Available recordings ({}):", recordings.len());
        for rec in &recordings {
            println!("  - {rec}");
        }
        println!("\nRun one with: gameswarm -a <recording_name>");
        return Ok(());
    }

    let Some(agent_id) = cli.agent else {
        bail!(
            "an agent must be specified; available agent types: {} (use --list-recordings to see recordings)",
            registry.policy_ids().join(", ")
        );
    };
    if !registry.contains(&agent_id) {
        bail!(
            "unknown agent '{}'; available agent types: {} (use --list-recordings to see recordings)",
            agent_id,
            registry.policy_ids().join(", ")
        );
    }

    let service: Arc<dyn GameService> =
        Arc::new(HttpGameService::new(config.clone()).context("failed to build HTTP client")?);

    // Fetch the game catalogue; for playback agents the game can be
    // derived from the recording name when the API is unreachable.
    let full_games: Vec<String> = match service.list_games().await {
        Ok(games) => games.into_iter().map(|g| g.game_id).collect(),
        Err(e) => {
            error!("failed to fetch game list: {e}");
            Vec::new()
        }
    };
    let full_games = if full_games.is_empty() && agent_id.ends_with(RECORDING_SUFFIX) {
        let game = recorder::game_prefix(&agent_id)?;
        info!("using game '{game}' derived from the playback recording name");
        vec![game]
    } else {
        full_games
    };

    let games = match &cli.game {
        Some(filter) => filter_games(&full_games, filter),
        None => full_games.clone(),
    };
    info!("game list: {games:?}");

    if games.is_empty() {
        if full_games.is_empty() {
            bail!("no games available to play; check the API connection or recording name");
        }
        bail!(
            "no game matches filter '{}'; try a different filter",
            cli.game.unwrap_or_default()
        );
    }

    let swarm = Arc::new(Swarm::new(
        config,
        registry,
        service,
        agent_id,
        games,
    ));
    let shutdown = ShutdownController::new();

    // Bridge Ctrl+C into the one-shot shutdown notification
    {
        let shutdown = Arc::clone(&shutdown);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.trigger();
            }
        });
    }

    let mut background = {
        let swarm = Arc::clone(&swarm);
        tokio::spawn(async move { swarm.main().await })
    };

    let run_result = tokio::select! {
        _ = shutdown.triggered() => {
            info!("interrupt received, shutting down");
            None
        }
        res = &mut background => Some(res),
    };

    // All terminal paths converge on the idempotent cleanup before any
    // error propagates; when the run already closed its own scorecard
    // this is a no-op.
    swarm.cleanup().await;

    match run_result {
        Some(Ok(Ok(_))) => Ok(()),
        Some(Ok(Err(e))) => Err(e).context("run failed"),
        Some(Err(e)) => Err(e).context("swarm task panicked"),
        None => {
            // The abandoned unit observes the terminal state on its
            // next loop turn and publishes its in-flight trace; wait
            // for that, but never past the grace window.
            if tokio::time::timeout(INTERRUPT_JOIN_GRACE, &mut background)
                .await
                .is_err()
            {
                background.abort();
            }
            Ok(())
        }
    }
}
