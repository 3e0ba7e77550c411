// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # split-rt
//!
//! Command-line interface for edge/cloud split inference.
//!
//! ## Usage
//! ```bash
//! # Separate processes over a shared directory (one terminal each)
//! split-rt cloud --count 10
//! split-rt select --token 7_00001.png
//! split-rt edge data/7_00001.png
//! split-rt postprocess
//!
//! # Both sites in one process
//! split-rt simulate data/*.png --snr -10
//!
//! # Cost table and per-cut energy at a given SNR
//! split-rt inspect --snr 20
//! ```

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "split-rt",
    about = "Energy-aware split inference between an edge device and the cloud",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose the cut for one request and record its energy.
    Select {
        /// Correlation token of the request (usually the input file name).
        #[arg(short, long)]
        token: String,

        /// Use this SNR (dB) instead of the channel log.
        #[arg(long, allow_hyphen_values = true)]
        snr: Option<f64>,

        /// Where to write the decision for the edge and postprocess steps.
        #[arg(short, long, default_value = "files/decision.json")]
        decision: PathBuf,
    },

    /// Run the head on an input and publish it for the cloud.
    Edge {
        /// Input file; its name is the correlation token.
        input: PathBuf,

        /// Decision written by `select`. Selects afresh when missing or
        /// made for another token.
        #[arg(short, long, default_value = "files/decision.json")]
        decision: PathBuf,
    },

    /// Serve edge artifacts: run the tail and publish the result.
    Cloud {
        /// Number of artifacts to serve before exiting.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Wait for the cloud result, predict, and record the invocation.
    Postprocess {
        /// Decision written by `select`.
        #[arg(short, long, default_value = "files/decision.json")]
        decision: PathBuf,
    },

    /// Run edge and cloud in one process for each input.
    Simulate {
        /// Input files.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Use this SNR (dB) instead of the channel log.
        #[arg(long, allow_hyphen_values = true)]
        snr: Option<f64>,
    },

    /// Print the cost table with per-cut energy.
    Inspect {
        /// Evaluate transfer energy at this SNR (dB); flat fallback if absent.
        #[arg(long, allow_hyphen_values = true)]
        snr: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Select {
            token,
            snr,
            decision,
        } => commands::select::execute(config, token, snr, decision).await,
        Commands::Edge { input, decision } => commands::edge::execute(config, input, decision).await,
        Commands::Cloud { count } => commands::cloud::execute(config, count).await,
        Commands::Postprocess { decision } => commands::postprocess::execute(config, decision).await,
        Commands::Simulate { inputs, snr } => commands::simulate::execute(config, inputs, snr).await,
        Commands::Inspect { snr } => commands::inspect::execute(config, snr).await,
    }
}
