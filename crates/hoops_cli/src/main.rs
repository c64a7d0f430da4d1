//! hoops CLI
//!
//! Record-store maintenance, play submission and decision reports from the
//! command line. Every command prints pretty JSON on stdout; logs go to stderr.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use hoops_core::api::api_schemas;
use hoops_core::config::CaptureConfig;
use hoops_core::models::{GameId, NewGame, NewPlayer, NewTeam, PlayerId, TaggerIdentity, TeamId, UserId};
use hoops_core::store::{load_vocabulary, seed_vocabulary, MemoryStore, RecordStore};
use hoops_core::vocabulary::TagVocabulary;
use hoops_core::TaggingService;

#[derive(Parser)]
#[command(name = "hoops")]
#[command(about = "Basketball play tagging and decision analysis", version)]
struct Cli {
    /// Snapshot file backing the record store
    #[arg(long, global = true, env = "HOOPS_STORE", default_value = "hoops.store")]
    store: PathBuf,

    /// Capture config YAML (falls back to HOOPS_CONFIG_PATH, then defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Tagger id stamped on committed plays
    #[arg(long, global = true, env = "HOOPS_TAGGER")]
    tagger: Option<UserId>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one flow state, or list all states
    Flow { state: Option<String> },

    /// Check the flow graph, vocabulary and config against each other
    Validate,

    /// Insert the built-in tag vocabulary
    Seed,

    /// Manage teams
    Team {
        #[command(subcommand)]
        action: TeamCommand,
    },

    /// Manage players
    Player {
        #[command(subcommand)]
        action: PlayerCommand,
    },

    /// Manage games
    Game {
        #[command(subcommand)]
        action: GameCommand,
    },

    /// Commit a sequence of actions as one play
    Submit {
        #[arg(long)]
        game: GameId,
        #[arg(long)]
        quarter: u8,
        /// Time remaining in the period (M:SS)
        #[arg(long)]
        time: String,
        #[arg(long)]
        player: PlayerId,
        #[arg(long)]
        team: TeamId,
        /// Action names in order
        #[arg(required = true)]
        actions: Vec<String>,
    },

    /// Decision-quality report for a player
    Quality {
        #[arg(long)]
        player: PlayerId,
        #[arg(long)]
        game: Option<GameId>,
    },

    /// Decision-quality report for a team
    TeamQuality {
        #[arg(long)]
        team: TeamId,
        #[arg(long)]
        game: Option<GameId>,
    },

    /// Most frequent next actions after the given one
    Suggest { last: String },

    /// Tag counts for one game
    Summary {
        #[arg(long)]
        game: GameId,
    },

    /// Print JSON API schemas
    Schema { name: Option<String> },
}

#[derive(Subcommand)]
enum TeamCommand {
    Add {
        name: String,
        #[arg(long)]
        abbreviation: Option<String>,
    },
    List,
}

#[derive(Subcommand)]
enum PlayerCommand {
    Add {
        #[arg(long)]
        team: TeamId,
        name: String,
        #[arg(long)]
        jersey: Option<u8>,
        #[arg(long)]
        position: Option<String>,
    },
    List {
        #[arg(long)]
        team: Option<TeamId>,
    },
}

#[derive(Subcommand)]
enum GameCommand {
    Add {
        #[arg(long)]
        home: TeamId,
        #[arg(long)]
        away: TeamId,
        /// RFC 3339 start time; defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        #[arg(long)]
        location: Option<String>,
    },
    List,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let output = run(Cli::parse())?;
    println!("{}", output);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<CaptureConfig> {
    let config = match path {
        Some(path) => CaptureConfig::load(path),
        None => CaptureConfig::from_env(),
    }
    .context("Failed to load capture config")?;
    Ok(config)
}

fn pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

fn run(cli: Cli) -> Result<String> {
    let config = load_config(cli.config.as_deref())?;

    let store = Arc::new(
        MemoryStore::open(&cli.store)
            .with_context(|| format!("Failed to open record store {}", cli.store.display()))?,
    );
    let tagger = cli.tagger.unwrap_or_else(|| {
        let id = UserId::new();
        tracing::info!("No --tagger given, using session id {}", id);
        id
    });
    let service = TaggingService::new(store.clone(), config, TaggerIdentity::new(tagger));

    match cli.command {
        Commands::Flow { state: None } => {
            let states: Vec<_> = service
                .graph()
                .states()
                .map(|s| json!({ "key": s.key, "label": s.label, "options": s.options.len() }))
                .collect();
            pretty(&states)
        }
        Commands::Flow { state: Some(key) } => pretty(&service.flow_state(&key)?),
        Commands::Schema { name } => {
            let schemas = api_schemas();
            match name {
                Some(name) => match schemas.get(name.as_str()) {
                    Some(schema) => pretty(schema),
                    None => bail!("Unknown schema '{}'", name),
                },
                None => pretty(&schemas),
            }
        }
        Commands::Validate => validate(&service),
        Commands::Seed => {
            let created = seed_vocabulary(store.as_ref())?;
            pretty(&json!({ "created": created, "total": store.tags()?.len() }))
        }
        Commands::Team { action } => match action {
            TeamCommand::Add { name, abbreviation } => {
                pretty(&store.create_team(NewTeam { name, abbreviation })?)
            }
            TeamCommand::List => pretty(&store.teams()?),
        },
        Commands::Player { action } => match action {
            PlayerCommand::Add { team, name, jersey, position } => pretty(&store.create_player(NewPlayer {
                team_id: team,
                name,
                jersey_number: jersey,
                position,
            })?),
            PlayerCommand::List { team } => pretty(&store.players(team)?),
        },
        Commands::Game { action } => match action {
            GameCommand::Add { home, away, at, location } => pretty(&store.create_game(NewGame {
                home_team_id: home,
                away_team_id: away,
                scheduled_at: at.unwrap_or_else(Utc::now),
                location,
            })?),
            GameCommand::List => pretty(&store.games()?),
        },
        Commands::Submit { game, quarter, time, player, team, actions } => {
            pretty(&service.submit_sequence(game, quarter, &time, player, team, actions.as_slice())?)
        }
        Commands::Quality { player, game } => pretty(&service.player_decision_quality(player, game)?),
        Commands::TeamQuality { team, game } => pretty(&service.team_decision_quality(team, game)?),
        Commands::Suggest { last } => pretty(&service.next_tag_suggestions(&last)?),
        Commands::Summary { game } => pretty(&service.game_summary(game)?),
    }
}

fn validate(service: &TaggingService) -> Result<String> {
    let store_vocabulary = load_vocabulary(service.store())?;
    let vocabulary =
        if store_vocabulary.is_empty() { TagVocabulary::builtin() } else { store_vocabulary };

    let graph = service.graph();
    let unknown_actions = graph.unknown_actions(&vocabulary);
    let unknown_handoffs: Vec<&str> = service
        .config()
        .handoff_actions
        .iter()
        .map(String::as_str)
        .filter(|a| !vocabulary.contains(a))
        .collect();
    service.config().validate()?;

    let report = pretty(&json!({
        "states": graph.states().count(),
        "tags": vocabulary.len(),
        "unknownActions": unknown_actions,
        "unknownHandoffs": unknown_handoffs,
    }))?;
    if !unknown_actions.is_empty() || !unknown_handoffs.is_empty() {
        bail!("Validation failed:\n{}", report);
    }
    Ok(report)
}
