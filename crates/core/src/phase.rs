// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline phase definitions
//!
//! [`PIPELINE`] is the one ordered phase table. The store uses it to resolve
//! the role responsible for a phase, the controller uses it as the transition
//! table, and the built-in role registry derives each role's phases from it.

use crate::error::SquadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A phase id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Init,
    Research,
    SourceValidation,
    DnaExtraction,
    AgentScaffolding,
    TaskAnatomy,
    QualityGate,
    Integration,
    SmokeTest,
    Completed,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::Research => "research",
            Phase::SourceValidation => "source_validation",
            Phase::DnaExtraction => "dna_extraction",
            Phase::AgentScaffolding => "agent_scaffolding",
            Phase::TaskAnatomy => "task_anatomy",
            Phase::QualityGate => "quality_gate",
            Phase::Integration => "integration",
            Phase::SmokeTest => "smoke_test",
            Phase::Completed => "completed",
            Phase::Failed => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = SquadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PIPELINE
            .descriptors()
            .iter()
            .map(|d| d.phase)
            .find(|p| p.as_str() == s)
            .ok_or_else(|| SquadError::InvalidPhase {
                received: s.to_string(),
            })
    }
}

/// Where a phase sits in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// Slot every run starts in before any role picks it up
    Staging,
    /// A phase with a responsible role
    Working,
    /// The end of the forward sequence
    Terminal,
    /// Off the forward sequence, reached only by aborting
    Failure,
}

/// One row of the phase table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDescriptor {
    pub phase: Phase,
    /// Key of the responsible role in the role registry
    pub role: Option<&'static str>,
    /// Entering this phase halts the pipeline until a human approves
    pub human_checkpoint: bool,
    pub kind: PhaseKind,
}

impl PhaseDescriptor {
    const fn new(
        phase: Phase,
        role: Option<&'static str>,
        human_checkpoint: bool,
        kind: PhaseKind,
    ) -> Self {
        Self {
            phase,
            role,
            human_checkpoint,
            kind,
        }
    }

    /// Tracked phases are the ones reported by the progress view
    pub fn is_tracked(&self) -> bool {
        matches!(self.kind, PhaseKind::Working | PhaseKind::Terminal)
    }
}

/// Ordered, read-only phase table
#[derive(Debug)]
pub struct PipelineDefinition {
    phases: &'static [PhaseDescriptor],
}

const MIND_CLONER: Option<&str> = Some("oalanicolas");
const PROCESS_OWNER: Option<&str> = Some("pedro-valerio");
const INTEGRATOR: Option<&str> = Some("squad-chief");

/// The squad creation pipeline
pub static PIPELINE: PipelineDefinition = PipelineDefinition {
    phases: &[
        PhaseDescriptor::new(Phase::Init, None, false, PhaseKind::Staging),
        PhaseDescriptor::new(Phase::Research, MIND_CLONER, false, PhaseKind::Working),
        PhaseDescriptor::new(Phase::SourceValidation, MIND_CLONER, false, PhaseKind::Working),
        PhaseDescriptor::new(Phase::DnaExtraction, MIND_CLONER, false, PhaseKind::Working),
        PhaseDescriptor::new(Phase::AgentScaffolding, MIND_CLONER, false, PhaseKind::Working),
        PhaseDescriptor::new(Phase::TaskAnatomy, PROCESS_OWNER, false, PhaseKind::Working),
        PhaseDescriptor::new(Phase::QualityGate, PROCESS_OWNER, true, PhaseKind::Working),
        PhaseDescriptor::new(Phase::Integration, INTEGRATOR, false, PhaseKind::Working),
        PhaseDescriptor::new(Phase::SmokeTest, INTEGRATOR, false, PhaseKind::Working),
        PhaseDescriptor::new(Phase::Completed, None, false, PhaseKind::Terminal),
        PhaseDescriptor::new(Phase::Failed, None, false, PhaseKind::Failure),
    ],
};

impl PipelineDefinition {
    pub fn descriptors(&self) -> &'static [PhaseDescriptor] {
        self.phases
    }

    /// All phase ids in table order
    pub fn ids(&self) -> Vec<&'static str> {
        self.phases.iter().map(|d| d.phase.as_str()).collect()
    }

    pub fn descriptor(&self, phase: Phase) -> Option<&'static PhaseDescriptor> {
        self.phases.iter().find(|d| d.phase == phase)
    }

    /// Role responsible for a phase, if any
    pub fn role_for(&self, phase: Phase) -> Option<&'static str> {
        self.descriptor(phase).and_then(|d| d.role)
    }

    pub fn requires_checkpoint(&self, phase: Phase) -> bool {
        self.descriptor(phase).is_some_and(|d| d.human_checkpoint)
    }

    /// The phase a fresh or re-initialized run sits in
    pub fn initial(&self) -> Phase {
        self.phases
            .iter()
            .find(|d| d.kind == PhaseKind::Staging)
            .map_or(Phase::Init, |d| d.phase)
    }

    /// The first phase with a responsible role
    pub fn first_working(&self) -> Option<&'static PhaseDescriptor> {
        self.phases.iter().find(|d| d.kind == PhaseKind::Working)
    }

    /// The next phase in the forward sequence.
    ///
    /// The failure phase is not part of the sequence: it has no successor and
    /// is never returned.
    pub fn next_after(&self, current: Phase) -> Option<&'static PhaseDescriptor> {
        let mut forward = self.phases.iter().filter(|d| d.kind != PhaseKind::Failure);
        forward.find(|d| d.phase == current)?;
        forward.next()
    }

    /// Phases shown in the progress view, in order
    pub fn tracked(&self) -> impl Iterator<Item = &'static PhaseDescriptor> {
        self.phases.iter().filter(|d| d.is_tracked())
    }

    /// Position of a phase among the tracked phases
    pub fn tracked_index(&self, phase: Phase) -> Option<usize> {
        self.tracked().position(|d| d.phase == phase)
    }

    /// Phases a role is responsible for, in order
    pub fn phases_for_role(&self, role: &str) -> Vec<Phase> {
        self.phases
            .iter()
            .filter(|d| d.role == Some(role))
            .map(|d| d.phase)
            .collect()
    }

    /// Role keys in the order they first appear in the table
    pub fn roles_in_order(&self) -> Vec<&'static str> {
        let mut roles: Vec<&'static str> = Vec::new();
        for role in self.phases.iter().filter_map(|d| d.role) {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        roles
    }
}

#[cfg(test)]
#[path = "phase_tests.rs"]
mod tests;
