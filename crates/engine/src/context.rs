// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-role context document
//!
//! Read-only: combines a run's record with the role registry so a role can
//! pick the work up where it was left.

use crate::discovery::OutputDiscovery;
use serde::Serialize;
use sq_core::{
    CheckpointStatus, Clock, Metadata, Phase, RoleDescriptor, RoleRegistry, Slug, SquadError,
    SystemClock,
};
use sq_storage::StateStore;
use std::path::PathBuf;
use tracing::debug;

/// The role the document is assembled for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentProfile {
    pub key: String,
    pub persona: String,
    pub role: String,
    pub phases: Vec<Phase>,
    pub source: Option<String>,
}

impl From<&RoleDescriptor> for AgentProfile {
    fn from(role: &RoleDescriptor) -> Self {
        Self {
            key: role.key.clone(),
            persona: role.persona.clone(),
            role: role.role.clone(),
            phases: role.phases.clone(),
            source: role.source.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SquadContext {
    pub slug: Slug,
    pub display_name: String,
    pub current_phase: Phase,
    pub checkpoint_status: CheckpointStatus,
    /// Directory holding the squad's generated files
    pub output_dir: PathBuf,
    pub state_file: PathBuf,
    pub completed_outputs: Vec<String>,
    pub agent_history: Vec<String>,
    pub handoff_from: Option<String>,
    pub handoff_to: Option<String>,
    pub metadata: Metadata,
    pub agent: AgentProfile,
}

pub struct ContextAssembler<D, C: Clock = SystemClock> {
    store: StateStore<C>,
    registry: RoleRegistry,
    discovery: D,
}

impl<D, C> ContextAssembler<D, C>
where
    D: OutputDiscovery,
    C: Clock,
{
    pub fn new(store: StateStore<C>, registry: RoleRegistry, discovery: D) -> Self {
        Self {
            store,
            registry,
            discovery,
        }
    }

    /// Look up a role, failing with `INVALID_AGENT` for unknown keys
    pub fn role(&self, key: &str) -> Result<&RoleDescriptor, SquadError> {
        self.registry.get(key)
    }

    /// Build the context document for `role` working on `slug`.
    ///
    /// Recorded outputs take precedence; only when none are recorded is the
    /// squad directory scanned.
    pub fn assemble(&self, role: &str, slug: &Slug) -> Result<SquadContext, SquadError> {
        let descriptor = self.registry.get(role)?;
        let state = self.store.read(slug)?;
        let output_dir = self.store.squad_dir(slug);

        let completed_outputs = if state.completed_outputs.is_empty() {
            let found = self.discovery.discover(&output_dir);
            debug!(slug = %slug, found = found.len(), "discovered outputs");
            found
        } else {
            state.completed_outputs
        };
        debug!(slug = %slug, role, "assembled context");

        Ok(SquadContext {
            slug: state.slug,
            display_name: state.display_name,
            current_phase: state.current_phase,
            checkpoint_status: state.checkpoint_status,
            state_file: self.store.state_path(slug),
            output_dir,
            completed_outputs,
            agent_history: state.agent_history,
            handoff_from: self.registry.handoff_from(role).map(str::to_string),
            handoff_to: self.registry.handoff_to(role).map(str::to_string),
            metadata: state.metadata,
            agent: AgentProfile::from(descriptor),
        })
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
