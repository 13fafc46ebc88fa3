// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline commands: start, next, approve, revise, abort, resume, status

use super::state::{RunDetails, SlugArg};
use super::Env;
use crate::error::CliError;
use crate::output;
use clap::Args;
use serde_json::Value;
use sq_core::{Phase, Slug};

#[derive(Args)]
pub struct StartArgs {
    /// Squad identifier (snake_case)
    pub slug: String,
    #[command(flatten)]
    pub details: RunDetails,
}

#[derive(Args)]
pub struct NextArgs {
    /// Squad identifier (defaults to the active squad)
    pub slug: Option<String>,
    /// Advance even if the current phase is not complete
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ApproveArgs {
    /// Squad identifier (defaults to the active squad)
    pub slug: Option<String>,
    /// Skip the concurrency check
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ReviseArgs {
    /// Squad identifier (defaults to the active squad)
    pub slug: Option<String>,
    /// Phase to return to
    #[arg(long = "to")]
    pub target: String,
    /// Skip the concurrency check
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AbortArgs {
    /// Squad identifier (defaults to the active squad)
    pub slug: Option<String>,
    /// Why the run is abandoned
    #[arg(long)]
    pub reason: Option<String>,
}

pub fn start(env: &Env, args: StartArgs) -> Result<Value, CliError> {
    let slug = Slug::new(args.slug)?;
    let report = env.workflow().start(&slug, args.details.into())?;
    output::success("start", &report)
}

pub fn next(env: &Env, args: NextArgs) -> Result<Value, CliError> {
    let session = env.session(args.slug.as_deref())?;
    let outcome = env.workflow().next(&session.slug, args.force)?;
    output::success("next", &outcome)
}

pub fn approve(env: &Env, args: ApproveArgs) -> Result<Value, CliError> {
    let session = env.session(args.slug.as_deref())?;
    let report = env.workflow().approve(&session.slug, args.force)?;
    output::success("approve", &report)
}

pub fn revise(env: &Env, args: ReviseArgs) -> Result<Value, CliError> {
    let target: Phase = args.target.parse()?;
    let session = env.session(args.slug.as_deref())?;
    let report = env.workflow().revise(&session.slug, target, args.force)?;
    output::success("revise", &report)
}

pub fn abort(env: &Env, args: AbortArgs) -> Result<Value, CliError> {
    let session = env.session(args.slug.as_deref())?;
    let report = env.workflow().abort(&session.slug, args.reason)?;
    output::success("abort", &report)
}

pub fn resume(env: &Env, args: SlugArg) -> Result<Value, CliError> {
    let session = env.session(args.slug.as_deref())?;
    let report = env.workflow().resume(&session.slug)?;
    output::success("resume", &report)
}

pub fn status(env: &Env, args: SlugArg) -> Result<Value, CliError> {
    let session = env.session(args.slug.as_deref())?;
    let report = env.workflow().status(&session.slug)?;
    output::success("status", &report)
}
