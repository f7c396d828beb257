//! Command-line interface for strictly_arena.

use clap::{Parser, Subcommand, ValueEnum};
use std::num::NonZeroU32;
use std::path::PathBuf;
use strictly_nim::{Participant, Piles};

/// Strictly Arena - misère Nim against a trained policy
#[derive(Parser, Debug)]
#[command(name = "strictly_arena")]
#[command(about = "Play misère Nim against a self-trained opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Train a policy, then play against it on the terminal
    Play {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the number of training games
        #[arg(long)]
        episodes: Option<NonZeroU32>,

        /// Override the pile layout, e.g. "1,3,5,7"
        #[arg(long)]
        piles: Option<Piles>,

        /// Override who moves first (human or ai)
        #[arg(long)]
        first: Option<Participant>,

        /// Which policy drives the automated participant
        #[arg(long, value_enum, default_value_t = PolicyKind::QLearning)]
        policy: PolicyKind,

        /// Print events as JSON lines instead of text
        #[arg(long)]
        json: bool,
    },

    /// Train a policy and report how well it plays
    Train {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the number of training games
        #[arg(long)]
        episodes: Option<NonZeroU32>,
    },
}

/// Move providers selectable from the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    /// Tabular Q-learning trained by self-play
    QLearning,
    /// Closed-form optimal play
    NimSum,
}
