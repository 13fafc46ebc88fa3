// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record-level commands: init, update, get, list

use super::Env;
use crate::error::CliError;
use crate::output;
use clap::{Args, ValueEnum};
use serde_json::Value;
use sq_core::{CheckpointStatus, Phase, Slug};
use sq_storage::{InitOptions, ListFilter, UpdateOptions};

#[derive(Args)]
pub struct InitArgs {
    /// Squad identifier (snake_case)
    pub slug: String,
    #[command(flatten)]
    pub details: RunDetails,
}

/// Optional descriptive fields of a run
#[derive(Args)]
pub struct RunDetails {
    /// Display name (defaults to the title-cased slug)
    #[arg(long)]
    pub name: Option<String>,
    /// Mind the squad is cloned from
    #[arg(long)]
    pub source_mind: Option<String>,
    /// Domain the squad targets
    #[arg(long)]
    pub target_domain: Option<String>,
}

impl From<RunDetails> for InitOptions {
    fn from(details: RunDetails) -> Self {
        InitOptions {
            name: details.name,
            source_mind: details.source_mind,
            target_domain: details.target_domain,
        }
    }
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Squad identifier (defaults to the active squad)
    pub slug: Option<String>,
    /// Phase to move to
    #[arg(long)]
    pub phase: String,
    /// Status of that phase (default: in_progress)
    #[arg(long)]
    pub status: Option<String>,
    /// Output identifier to register
    #[arg(long)]
    pub output: Option<String>,
    /// Skip the concurrency check
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct SlugArg {
    /// Squad identifier (defaults to the active squad)
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListStatus {
    Active,
    Completed,
    All,
}

impl From<ListStatus> for ListFilter {
    fn from(status: ListStatus) -> Self {
        match status {
            ListStatus::Active => ListFilter::Active,
            ListStatus::Completed => ListFilter::Completed,
            ListStatus::All => ListFilter::All,
        }
    }
}

#[derive(Args)]
pub struct ListArgs {
    /// Which runs to include
    #[arg(long, value_enum, default_value = "all")]
    pub status: ListStatus,
}

pub fn init(env: &Env, args: InitArgs) -> Result<Value, CliError> {
    let slug = Slug::new(args.slug)?;
    let outcome = env.store.init(&slug, args.details.into())?;
    output::success("init", &outcome)
}

pub fn update(env: &Env, args: UpdateArgs) -> Result<Value, CliError> {
    // Validate before touching anything
    let phase: Phase = args.phase.parse()?;
    let status = args
        .status
        .as_deref()
        .map(str::parse::<CheckpointStatus>)
        .transpose()?;
    let session = env.session(args.slug.as_deref())?;

    let outcome = env.store.update(
        &session.slug,
        phase,
        status,
        UpdateOptions {
            force: args.force,
            output: args.output,
        },
    )?;
    output::success("update", &outcome)
}

pub fn get(env: &Env, args: SlugArg) -> Result<Value, CliError> {
    let session = env.session(args.slug.as_deref())?;
    let state = env.store.read(&session.slug)?;
    output::success("get", &state)
}

pub fn list(env: &Env, args: ListArgs) -> Result<Value, CliError> {
    let list = env.store.list(args.status.into())?;
    output::success("list", &list)
}
