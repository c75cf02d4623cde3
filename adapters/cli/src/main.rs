#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a local Maze CTF game.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use maze_ctf_core::TeamId;
use maze_ctf_system_game_master::{GameConfig, GameMaster, Player, SimpleTeam};
use maze_ctf_system_players::{AsciiViewer, FoodSeekerPlayer, RandomPlayer, StoppingPlayer};
use maze_ctf_world::{Outcome, Universe};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Run a capture-the-flag game between two teams of bots.
#[derive(Parser, Debug)]
#[command(name = "maze-ctf", about = "Run a local Maze CTF game", long_about = None)]
struct Args {
    /// Layout text, one maze row per line
    #[arg(long)]
    layout_string: Option<String>,

    /// Name of a built-in layout
    #[arg(long)]
    layout_name: Option<String>,

    /// File holding the layout text
    #[arg(long)]
    layout_file: Option<PathBuf>,

    /// Number of bots taken from the layout
    #[arg(short, long, default_value_t = 4)]
    bots: usize,

    /// Rounds played before the game is decided by score
    #[arg(short, long, default_value_t = 3000)]
    rounds: u32,

    /// Seed for every random choice; random when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Report every opponent at its true position
    #[arg(long)]
    no_noise: bool,

    /// Players controlling team 0
    #[arg(long, value_enum, default_value_t = PlayerKind::Food)]
    team_a: PlayerKind,

    /// Players controlling team 1
    #[arg(long, value_enum, default_value_t = PlayerKind::Random)]
    team_b: PlayerKind,

    /// Print the board after every turn
    #[arg(long)]
    ascii: bool,

    /// Print a JSON summary instead of plain text
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Stock player strategies selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PlayerKind {
    /// Uniformly random legal moves
    Random,
    /// Shortest path to the closest enemy food
    Food,
    /// Never moves
    Stop,
}

impl PlayerKind {
    fn build(self, seed: Option<u64>) -> Box<dyn Player> {
        match self {
            Self::Random => Box::new(
                seed.map_or_else(RandomPlayer::from_entropy, RandomPlayer::with_seed),
            ),
            Self::Food => Box::new(FoodSeekerPlayer::new()),
            Self::Stop => Box::new(StoppingPlayer),
        }
    }
}

/// Entry point for the Maze CTF command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install the tracing subscriber")?;

    let config = build_config(&args)?;
    let mut game = GameMaster::from_config(&config).context("failed to set up the game")?;

    for (index, kind) in [args.team_a, args.team_b].into_iter().enumerate() {
        let team = build_team(game.universe(), index, kind, config.seed());
        let name = format!("{kind:?}").to_lowercase();
        let _ = game.register_team(team, Some(name))?;
    }
    if args.ascii {
        game.register_viewer(AsciiViewer::stdout())?;
    }

    let outcome = game.play()?;
    info!(rounds = game.universe().round(), "game finished");
    report(game.universe(), outcome, args.json)
}

fn build_config(args: &Args) -> Result<GameConfig> {
    let mut builder = GameConfig::builder()
        .bot_count(args.bots)
        .max_rounds(args.rounds)
        .noise(!args.no_noise);
    if let Some(layout) = &args.layout_string {
        builder = builder.layout_string(layout.replace("\\n", "\n"));
    }
    if let Some(name) = &args.layout_name {
        builder = builder.layout_name(name.clone());
    }
    if let Some(path) = &args.layout_file {
        builder = builder.layout_file(path.clone());
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    builder.build().context("invalid game configuration")
}

fn build_team(
    universe: &Universe,
    index: usize,
    kind: PlayerKind,
    seed: Option<u64>,
) -> SimpleTeam {
    let bots = universe
        .team(TeamId::new(u32::try_from(index).unwrap_or(u32::MAX)))
        .map_or(0, |team| team.bots().len());
    let players = (0..bots)
        .map(|offset| {
            let player_seed = seed.map(|seed| {
                seed.wrapping_add((index * bots + offset) as u64)
                    .wrapping_add(1)
            });
            kind.build(player_seed)
        })
        .collect();
    SimpleTeam::new(players)
}

fn describe(outcome: Outcome) -> String {
    match outcome {
        Outcome::Winner(team) => format!("{team} wins"),
        Outcome::Draw => "draw".to_owned(),
    }
}

fn report(universe: &Universe, outcome: Outcome, json: bool) -> Result<()> {
    if json {
        let summary = serde_json::json!({
            "outcome": describe(outcome),
            "rounds": universe.round(),
            "teams": universe.teams().iter().map(|team| serde_json::json!({
                "name": team.name(),
                "score": team.score(),
            })).collect::<Vec<_>>(),
            "layout": universe.to_layout_string(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", universe.to_layout_string());
    for team in universe.teams() {
        println!("{} ({}): {}", team.name(), team.id(), team.score());
    }
    println!("{} after {} rounds", describe(outcome), universe.round());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_ctf_system_game_master::LayoutSource;

    #[test]
    fn defaults_match_the_game_defaults() {
        let args = Args::try_parse_from(["maze-ctf"]).expect("defaults parse");
        let config = build_config(&args).expect("valid configuration");

        assert_eq!(config, GameConfig::default());
        assert_eq!(args.team_a, PlayerKind::Food);
        assert_eq!(args.team_b, PlayerKind::Random);
    }

    #[test]
    fn flags_flow_into_the_configuration() {
        let args = Args::try_parse_from([
            "maze-ctf",
            "--layout-name",
            "spiral",
            "--bots",
            "2",
            "--rounds",
            "40",
            "--seed",
            "9",
            "--no-noise",
            "--team-b",
            "stop",
        ])
        .expect("flags parse");
        let config = build_config(&args).expect("valid configuration");

        assert_eq!(config.layout(), &LayoutSource::Named("spiral".to_owned()));
        assert_eq!(config.bot_count(), 2);
        assert_eq!(config.max_rounds(), 40);
        assert_eq!(config.seed(), Some(9));
        assert!(!config.noise());
        assert_eq!(args.team_b, PlayerKind::Stop);
    }

    #[test]
    fn escaped_newlines_separate_layout_rows() {
        let args = Args::try_parse_from([
            "maze-ctf",
            "--layout-string",
            "######\\n#0  1#\\n######",
        ])
        .expect("flags parse");
        let config = build_config(&args).expect("valid configuration");

        assert_eq!(
            config.layout(),
            &LayoutSource::Text("######\n#0  1#\n######".to_owned())
        );
    }

    #[test]
    fn teams_get_one_player_per_bot() {
        let universe = Universe::from_layout(
            "
            ########
            #0 2 1 #
            ########",
            3,
        )
        .expect("valid layout");

        assert_eq!(build_team(&universe, 0, PlayerKind::Stop, None).player_count(), 2);
        assert_eq!(build_team(&universe, 1, PlayerKind::Random, Some(4)).player_count(), 1);
    }
}
