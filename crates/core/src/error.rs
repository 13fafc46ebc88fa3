// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy shared by the store, the controller and the assembler
//!
//! Every variant maps to a stable machine-readable code plus a details object,
//! which the binary renders into the failure envelope.

use serde_json::{json, Value};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = SquadError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SquadError {
    #[error("slug must be snake_case: {received}")]
    InvalidSlug { received: String },

    #[error("invalid phase: {received}")]
    InvalidPhase { received: String },

    #[error("invalid status: {received}")]
    InvalidStatus { received: String },

    #[error("invalid agent key: {received}")]
    InvalidAgent {
        received: String,
        valid_keys: Vec<String>,
    },

    #[error("no state found for slug: {slug}")]
    StateNotFound { slug: String, path: PathBuf },

    #[error("no slug provided and no active squad recorded")]
    NoActiveSquad,

    #[error("state for {slug} is corrupted: {reason}")]
    CorruptedState {
        slug: String,
        path: PathBuf,
        reason: String,
    },

    #[error("state for {slug} was modified {elapsed_ms}ms ago (window {window_ms}ms)")]
    ConcurrentModification {
        slug: String,
        elapsed_ms: i64,
        window_ms: u64,
    },

    #[error("current phase \"{phase}\" is not complete")]
    PhaseNotComplete {
        phase: String,
        status: String,
        awaiting_decision: bool,
    },

    #[error("not at a human checkpoint")]
    NotAtCheckpoint { phase: String, status: String },

    #[error("invalid configuration in {source_name}: {reason}")]
    InvalidConfig { source_name: String, reason: String },

    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SquadError {
    /// Stable code used in the failure envelope
    pub fn code(&self) -> &'static str {
        match self {
            SquadError::InvalidSlug { .. } => "INVALID_SLUG",
            SquadError::InvalidPhase { .. } => "INVALID_PHASE",
            SquadError::InvalidStatus { .. } => "INVALID_STATUS",
            SquadError::InvalidAgent { .. } => "INVALID_AGENT",
            SquadError::StateNotFound { .. } => "STATE_NOT_FOUND",
            SquadError::NoActiveSquad => "NO_ACTIVE_SQUAD",
            SquadError::CorruptedState { .. } => "CORRUPTED_STATE",
            SquadError::ConcurrentModification { .. } => "CONCURRENT_MODIFICATION",
            SquadError::PhaseNotComplete { .. } => "PHASE_NOT_COMPLETE",
            SquadError::NotAtCheckpoint { .. } => "NOT_AT_CHECKPOINT",
            SquadError::InvalidConfig { .. } => "INVALID_CONFIG",
            SquadError::Io { .. } => "IO_ERROR",
        }
    }

    /// Structured details for the failure envelope
    pub fn details(&self) -> Value {
        match self {
            SquadError::InvalidSlug { received } => json!({
                "received": received,
                "expected_pattern": crate::slug::SLUG_PATTERN,
            }),
            SquadError::InvalidPhase { received } => json!({
                "received": received,
                "valid_phases": crate::phase::PIPELINE.ids(),
            }),
            SquadError::InvalidStatus { received } => json!({
                "received": received,
                "valid_statuses": crate::status::CheckpointStatus::ids(),
            }),
            SquadError::InvalidAgent {
                received,
                valid_keys,
            } => json!({ "received": received, "valid_keys": valid_keys }),
            SquadError::StateNotFound { slug, path } => json!({
                "slug": slug,
                "path": path,
                "hint": format!("Run: sq init {}", slug),
            }),
            SquadError::NoActiveSquad => json!({ "hint": "Run: sq init <slug>" }),
            SquadError::CorruptedState { slug, path, reason } => json!({
                "slug": slug,
                "path": path,
                "reason": reason,
                "hint": format!("Re-initialize with: sq init {}", slug),
            }),
            SquadError::ConcurrentModification {
                slug,
                elapsed_ms,
                window_ms,
            } => json!({
                "slug": slug,
                "elapsed_ms": elapsed_ms,
                "window_ms": window_ms,
                "hint": "Use --force to override",
            }),
            SquadError::PhaseNotComplete {
                phase,
                status,
                awaiting_decision,
            } => json!({
                "current_phase": phase,
                "current_status": status,
                "hint": if *awaiting_decision {
                    "Awaiting human decision: approve, revise or abort"
                } else {
                    "Complete the current phase first, or use --force to skip"
                },
            }),
            SquadError::NotAtCheckpoint { phase, status } => json!({
                "current_phase": phase,
                "current_status": status,
            }),
            SquadError::InvalidConfig {
                source_name,
                reason,
            } => json!({ "source": source_name, "reason": reason }),
            SquadError::Io { path, source } => json!({
                "path": path,
                "reason": source.to_string(),
            }),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SquadError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Attach a path to io errors, for use with `map_err`
pub fn io_at(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> SquadError {
    let path = path.into();
    move |source| SquadError::io(path, source)
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
