// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failures as reported in the JSON envelope

use serde::Serialize;
use serde_json::{json, Value};
use sq_core::SquadError;

/// The `error` object of a failure envelope
#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

impl CliError {
    /// Command line that clap could not parse
    pub fn arguments(err: &clap::Error) -> Self {
        let rendered = err.render().to_string();
        let message = rendered
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ")
            .to_string();
        Self {
            code: "INVALID_ARGUMENTS",
            message,
            details: json!({ "usage": rendered.trim_end() }),
        }
    }
}

impl From<SquadError> for CliError {
    fn from(err: SquadError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            details: err.details(),
        }
    }
}
