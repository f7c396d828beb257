//! Strictly Arena - terminal front end
//!
//! Trains the automated participant once at startup, then plays misère Nim
//! against it over stdin/stdout.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, PolicyKind};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Instant;
use strictly_arena::policy::reachable_positions;
use strictly_arena::terminal::{self, HELP, Input};
use strictly_arena::{
    GameConfig, GameEvent, NimSumPolicy, Orchestrator, PolicyProvider, QLearningPolicy,
    Trainable, TurnController,
};
use strictly_nim::{Participant, Piles, rules};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with the board.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            episodes,
            piles,
            first,
            policy,
            json,
        } => {
            let config = load_config(config, episodes, piles, first)?;
            run_play(config, policy, json).await
        }
        Command::Train { config, episodes } => {
            let config = load_config(config, episodes, None, None)?;
            run_train(config).await
        }
    }
}

/// Reads the config file (if any) and applies command-line overrides.
#[instrument]
fn load_config(
    path: Option<PathBuf>,
    episodes: Option<NonZeroU32>,
    piles: Option<Piles>,
    first: Option<Participant>,
) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => GameConfig::from_file(&path)
            .with_context(|| format!("Loading {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Some(episodes) = episodes {
        let training = config.training().clone().with_episodes(episodes);
        config = config.with_training(training);
    }
    if let Some(piles) = piles {
        config = config.with_initial_piles(piles);
    }
    if let Some(first) = first {
        config = config.with_first_mover(first);
    }

    config.validate()?;
    Ok(config)
}

/// Trains off the async runtime; training is CPU-bound.
async fn train_q_learning(config: &GameConfig) -> Result<QLearningPolicy> {
    let layout = config.initial_piles().clone();
    let training = config.training().clone();
    info!(episodes = training.episodes().get(), piles = %layout, "Training policy");
    let policy =
        tokio::task::spawn_blocking(move || QLearningPolicy::train(&layout, &training)).await?;
    Ok(policy)
}

/// Plays on the terminal until the user quits.
#[instrument(skip(config))]
async fn run_play(config: GameConfig, kind: PolicyKind, json: bool) -> Result<()> {
    let policy: Box<dyn PolicyProvider> = match kind {
        PolicyKind::QLearning => Box::new(train_q_learning(&config).await?),
        PolicyKind::NimSum => Box::new(NimSumPolicy::new()),
    };

    let controller = TurnController::new(
        config.initial_piles().clone(),
        *config.first_mover(),
        policy,
    );
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (orchestrator, handle) =
        Orchestrator::new(controller, config.automated_delay(), event_tx);
    let mut game = tokio::spawn(orchestrator.run());

    if !json {
        println!("{}", HELP);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    handle.shutdown()?;
                    break;
                };
                match line.parse::<Input>() {
                    Ok(Input::Command(command)) => handle.send(command)?,
                    Ok(Input::Help) => println!("{}", HELP),
                    Ok(Input::Quit) => {
                        handle.shutdown()?;
                        break;
                    }
                    Err(err) => println!("{}", err),
                }
            }
            Some(event) = event_rx.recv() => {
                if json {
                    println!("{}", serde_json::to_string(&event)?);
                } else {
                    println!("{}", terminal::render_event(&event));
                }
                if matches!(event, GameEvent::GameOver { .. }) && !json {
                    println!("Type 'restart' or 'new human|ai' to play again.");
                }
            }
            result = &mut game => {
                // Only a fault stops the orchestrator on its own.
                let controller = result??;
                warn!(generation = controller.generation(), "Orchestrator stopped unexpectedly");
                return Ok(());
            }
        }
    }

    let controller = game.await??;
    if !json {
        println!("\n{}", terminal::render_history(controller.history()));
    }
    info!(games = controller.generation() + 1, "Goodbye");
    Ok(())
}

/// Trains a policy and reports how often it agrees with optimal play.
#[instrument(skip(config))]
async fn run_train(config: GameConfig) -> Result<()> {
    let started = Instant::now();
    let mut learned = train_q_learning(&config).await?;
    let elapsed = started.elapsed();

    // Positions where a winning move exists, and how many of them the
    // learned policy actually converts.
    let mut winnable = 0usize;
    let mut agreed = 0usize;
    for position in reachable_positions(config.initial_piles()) {
        if NimSumPolicy::winning_move(&position).is_none() {
            continue;
        }
        winnable += 1;
        let converts = learned
            .choose_action(&position, false)
            .and_then(|action| position.after(action).ok())
            .is_some_and(|next| rules::is_losing_position(&next));
        if converts {
            agreed += 1;
        }
    }

    println!("Trained on {} in {:.2?}", config.initial_piles(), elapsed);
    println!("Table entries: {}", learned.table_len());
    println!(
        "Winning positions played optimally: {}/{} ({:.1}%)",
        agreed,
        winnable,
        100.0 * agreed as f64 / winnable.max(1) as f64
    );
    Ok(())
}
