// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted pipeline record
//!
//! The record is plain data plus the pure mutations the store applies to it.
//! Reading, writing and the concurrency guard live in `sq-storage`.

use crate::phase::{Phase, PhaseKind, PIPELINE};
use crate::slug::Slug;
use crate::status::CheckpointStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// History entry for a phase that has been entered at least once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub status: CheckpointStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Role responsible for the phase
    #[serde(default)]
    pub agent: Option<String>,
}

/// Free-form auxiliary fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub source_mind: Option<String>,
    #[serde(default)]
    pub target_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort_reason: Option<String>,
    /// Fields written by other tools, kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    pub slug: Slug,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub current_phase: Phase,
    pub checkpoint_status: CheckpointStatus,
    #[serde(default)]
    pub phases: BTreeMap<Phase, PhaseRecord>,
    #[serde(default)]
    pub completed_outputs: Vec<String>,
    #[serde(default)]
    pub agent_history: Vec<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl PipelineState {
    /// Create a fresh record sitting in the initial phase
    pub fn new(
        slug: Slug,
        display_name: Option<String>,
        metadata: Metadata,
        now: DateTime<Utc>,
    ) -> Self {
        let display_name = display_name.unwrap_or_else(|| slug.display_name());
        Self {
            slug,
            display_name,
            created_at: now,
            updated_at: now,
            current_phase: PIPELINE.initial(),
            checkpoint_status: CheckpointStatus::Pending,
            phases: BTreeMap::new(),
            completed_outputs: Vec::new(),
            agent_history: Vec::new(),
            metadata,
        }
    }

    /// Put the run back in the initial phase, keeping its history
    pub fn restart(&mut self, now: DateTime<Utc>) {
        self.current_phase = PIPELINE.initial();
        self.checkpoint_status = CheckpointStatus::Pending;
        self.updated_at = now;
    }

    /// Enter (or re-enter) a phase with the given status.
    ///
    /// The phase entry keeps its first `started_at`; `completed_at` is only set
    /// when the status is `completed`. Entries for other phases are untouched.
    /// Returns the role responsible for the phase.
    pub fn enter_phase(
        &mut self,
        phase: Phase,
        status: CheckpointStatus,
        now: DateTime<Utc>,
    ) -> Option<&'static str> {
        let agent = PIPELINE.role_for(phase);
        let started_at = self.phases.get(&phase).map_or(now, |r| r.started_at);
        self.phases.insert(
            phase,
            PhaseRecord {
                status,
                started_at,
                completed_at: (status == CheckpointStatus::Completed).then_some(now),
                agent: agent.map(str::to_string),
            },
        );

        self.current_phase = phase;
        self.checkpoint_status = status;
        self.updated_at = now;

        if let Some(role) = agent {
            push_unique(&mut self.agent_history, role);
        }
        agent
    }

    /// Register an output identifier; returns false if it was already present
    pub fn record_output(&mut self, output: &str) -> bool {
        push_unique(&mut self.completed_outputs, output)
    }

    /// The run has reached the end of the pipeline or was aborted
    pub fn is_finished(&self) -> bool {
        PIPELINE.descriptor(self.current_phase).is_some_and(|d| {
            matches!(d.kind, PhaseKind::Terminal | PhaseKind::Failure)
        })
    }

    /// Nothing is left to do in the current position: the run is finished or
    /// its phase reports completion
    pub fn is_concluded(&self) -> bool {
        self.is_finished() || self.checkpoint_status == CheckpointStatus::Completed
    }

    /// The run is parked at the human checkpoint
    pub fn awaiting_decision(&self) -> bool {
        self.checkpoint_status == CheckpointStatus::Checkpoint
    }
}

fn push_unique(items: &mut Vec<String>, value: &str) -> bool {
    if items.iter().any(|existing| existing == value) {
        return false;
    }
    items.push(value.to_string());
    true
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
