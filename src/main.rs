//! sweep-reason CLI: knowledge-based minesweeper inference.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use sweep_reason::{
    BoardError, Cell, Game, GameOutcome, GameReport, KnowledgeBase, SweepConfig,
};

#[derive(Parser)]
#[command(
    name = "sweep-reason",
    version,
    about = "Knowledge-based minesweeper inference engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Let the solver play one or more games on random boards.
    Play {
        /// TOML config file. Flags below override its values.
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        height: Option<usize>,

        #[arg(long)]
        width: Option<usize>,

        /// Number of hazards per board.
        #[arg(long)]
        hazards: Option<usize>,

        /// Seed for boards and random moves. Game `i` uses `seed + i`.
        #[arg(long)]
        seed: Option<u64>,

        /// Number of games to play.
        #[arg(long, default_value = "1")]
        games: usize,

        /// Print reports as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Print each board and the solver's final view.
        #[arg(long)]
        show_board: bool,
    },

    /// Feed observations to an empty knowledge base and print what follows.
    Deduce {
        #[arg(long)]
        height: usize,

        #[arg(long)]
        width: usize,

        /// An observation `row,col=count`. Repeatable.
        #[arg(long = "probe", value_parser = parse_probe)]
        probes: Vec<(Cell, usize)>,
    },

    /// Manage configuration files.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config file.
    Init {
        /// Target path.
        #[arg(long, default_value = "sweep-reason.toml")]
        path: PathBuf,
    },
}

#[derive(Serialize)]
struct PlaySummary<'a> {
    seed: u64,
    games: &'a [GameReport],
    won: usize,
    win_rate: f64,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            config,
            height,
            width,
            hazards,
            seed,
            games,
            json,
            show_board,
        } => {
            let mut config = match config {
                Some(path) => SweepConfig::load(&path)?,
                None => SweepConfig::default(),
            };
            config.height = height.unwrap_or(config.height);
            config.width = width.unwrap_or(config.width);
            config.hazards = hazards.unwrap_or(config.hazards);
            config.seed = seed.or(config.seed);
            config.validate()?;

            let base_seed = config.seed.unwrap_or_else(rand::random);
            let mut reports = Vec::with_capacity(games);

            for i in 0..games {
                let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(i as u64));
                let board = config.board(&mut rng)?;
                if show_board && !json {
                    println!("Game {}:\n{board}", i + 1);
                }

                let mut game = Game::new(board, config.inference.clone());
                let report = game.play(&mut rng);

                if !json {
                    println!("{}", format_report(i + 1, &report));
                    if show_board {
                        println!("{}", game.render());
                    }
                }
                reports.push(report);
            }

            let won = reports
                .iter()
                .filter(|r| r.outcome == GameOutcome::Won)
                .count();
            let win_rate = if reports.is_empty() {
                0.0
            } else {
                won as f64 / reports.len() as f64
            };

            if json {
                let summary = PlaySummary {
                    seed: base_seed,
                    games: &reports,
                    won,
                    win_rate,
                };
                println!(
                    "{}",
                    serde_json::to_string_pretty(&summary).into_diagnostic()?
                );
            } else {
                println!(
                    "\nWon {won}/{} games ({:.1}%), seed {base_seed}",
                    reports.len(),
                    win_rate * 100.0
                );
            }
        }

        Commands::Deduce {
            height,
            width,
            probes,
        } => {
            if height == 0 || width == 0 {
                return Err(BoardError::EmptyGrid { height, width }.into());
            }

            let mut kb = KnowledgeBase::new(height, width);
            for (cell, count) in probes {
                if !cell.in_bounds(height, width) {
                    return Err(BoardError::OutOfBounds {
                        cell,
                        height,
                        width,
                    }
                    .into());
                }
                let report = kb.update(cell, count);
                tracing::debug!(
                    cell = %cell,
                    count,
                    passes = report.passes,
                    "observation applied"
                );
            }

            println!("Hazards: {}", format_cells(kb.hazards().iter().copied()));
            println!("Safe:    {}", format_cells(kb.safe().iter().copied()));
            if kb.sentences().is_empty() {
                println!("No open sentences.");
            } else {
                println!("Open sentences ({}):", kb.sentences().len());
                for sentence in kb.sentences() {
                    println!("  {sentence}");
                }
            }
            match kb.next_safe_move() {
                Some(cell) => println!("Next safe move: {cell}"),
                None => println!("Next safe move: none proven"),
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Init { path } => {
                if path.exists() {
                    miette::bail!("{} already exists; refusing to overwrite", path.display());
                }
                SweepConfig::default().save(&path)?;
                println!("Wrote default config to {}", path.display());
            }
        },
    }

    Ok(())
}

/// Parse an observation of the form `row,col=count`.
fn parse_probe(s: &str) -> std::result::Result<(Cell, usize), String> {
    let (cell, count) = s
        .split_once('=')
        .ok_or_else(|| format!("expected `row,col=count`, got `{s}`"))?;
    let (row, col) = cell
        .split_once(',')
        .ok_or_else(|| format!("expected `row,col` before `=`, got `{cell}`"))?;
    let parse = |field: &str, what: &str| {
        field
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid {what} `{field}`: {e}"))
    };
    Ok((
        Cell::new(parse(row, "row")?, parse(col, "column")?),
        parse(count, "count")?,
    ))
}

fn format_cells(cells: impl Iterator<Item = Cell>) -> String {
    let mut cells: Vec<Cell> = cells.collect();
    if cells.is_empty() {
        return "(none)".into();
    }
    cells.sort();
    cells
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_report(index: usize, report: &GameReport) -> String {
    let outcome = match report.outcome {
        GameOutcome::Won => "won".to_string(),
        GameOutcome::Lost { cell } => format!("lost at {cell}"),
        GameOutcome::Stalled => "stalled".to_string(),
    };
    format!(
        "Game {index}: {outcome} after {} moves ({} safe, {} random), {} hazards flagged",
        report.moves, report.safe_moves, report.random_moves, report.hazards_found
    )
}
