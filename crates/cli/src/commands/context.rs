// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Context document for a role

use super::Env;
use crate::error::CliError;
use crate::output;
use clap::Args;
use serde_json::Value;
use sq_engine::{ContextAssembler, DirectoryScan};

#[derive(Args)]
pub struct ContextArgs {
    /// Role key, e.g. oalanicolas
    pub role: String,
    /// Squad identifier (defaults to the active squad)
    pub slug: Option<String>,
}

pub fn context(env: &Env, args: ContextArgs) -> Result<Value, CliError> {
    let assembler = ContextAssembler::new(
        env.store.clone(),
        env.config.registry.clone(),
        DirectoryScan::new(env.config.output_categories.clone()),
    );
    // An unknown role fails before the active pointer is consulted
    assembler.role(&args.role)?;
    let session = env.session(args.slug.as_deref())?;

    let context = assembler.assemble(&args.role, &session.slug)?;
    output::success("context", &context)
}
