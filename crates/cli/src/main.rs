// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sq - squad creation pipeline controller

mod commands;
mod config;
mod error;
mod output;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use commands::{context, state, workflow, Env};
use error::CliError;
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "sq",
    version,
    about = "sq - tracks squad creation pipelines through their phases"
)]
struct Cli {
    /// Directory holding one subdirectory per squad
    #[arg(long, global = true, env = "SQ_ROOT", default_value = "squads")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a pipeline record, or restart an existing one
    Init(state::InitArgs),
    /// Move a run to a phase
    Update(state::UpdateArgs),
    /// Print a run's record
    Get(state::SlugArg),
    /// List runs
    List(state::ListArgs),
    /// Initialize a run and enter the first working phase
    Start(workflow::StartArgs),
    /// Show where a run stands and what to do next
    Resume(state::SlugArg),
    /// Advance to the next phase
    Next(workflow::NextArgs),
    /// Show progress over every phase
    Status(state::SlugArg),
    /// Approve the human checkpoint
    Approve(workflow::ApproveArgs),
    /// Return to an earlier phase
    Revise(workflow::ReviseArgs),
    /// Abandon a run
    Abort(workflow::AbortArgs),
    /// Assemble the context document for a role
    Context(context::ContextArgs),
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return parse_failure(e),
    };
    setup_logging();

    match run(cli) {
        Ok(document) => {
            output::emit(&document);
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::debug!(code = error.code, "command failed");
            output::emit(&output::failure(&error));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Value, CliError> {
    let env = Env::load(cli.root)?;
    match cli.command {
        Commands::Init(args) => state::init(&env, args),
        Commands::Update(args) => state::update(&env, args),
        Commands::Get(args) => state::get(&env, args),
        Commands::List(args) => state::list(&env, args),
        Commands::Start(args) => workflow::start(&env, args),
        Commands::Resume(args) => workflow::resume(&env, args),
        Commands::Next(args) => workflow::next(&env, args),
        Commands::Status(args) => workflow::status(&env, args),
        Commands::Approve(args) => workflow::approve(&env, args),
        Commands::Revise(args) => workflow::revise(&env, args),
        Commands::Abort(args) => workflow::abort(&env, args),
        Commands::Context(args) => context::context(&env, args),
    }
}

/// Help and version go out as clap renders them; anything else is an envelope
fn parse_failure(e: clap::Error) -> ExitCode {
    match e.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let _ = e.print();
            ExitCode::SUCCESS
        }
        _ => {
            output::emit(&output::failure(&CliError::arguments(&e)));
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr so stdout stays a single JSON document
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("SQ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
