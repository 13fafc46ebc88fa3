// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline phase state machine
//!
//! Transitions follow [`PIPELINE`]: strictly forward, one human checkpoint
//! that only `approve`, `revise` or `abort` can pass, and a failure phase
//! reachable from anywhere by aborting.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sq_core::{
    CheckpointStatus, Clock, Phase, PhaseDescriptor, PhaseKind, PipelineState, Slug, SquadError,
    SystemClock, PIPELINE,
};
use sq_storage::{StateStore, UpdateOptions};
use tracing::{debug, info};

pub use sq_storage::InitOptions as StartOptions;

const DEFAULT_ABORT_REASON: &str = "Aborted by user";

/// What the caller should do next
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NextStep {
    Work { agent: &'static str, task: String },
    Notice { message: String },
}

impl NextStep {
    fn notice(message: &str) -> Self {
        NextStep::Notice {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartReport {
    pub slug: Slug,
    pub display_name: String,
    /// False when an existing run was restarted
    pub created: bool,
    pub current_phase: Phase,
    pub status: CheckpointStatus,
    pub next_step: NextStep,
}

/// How to leave a human checkpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckpointInstructions {
    pub agent: Option<&'static str>,
    pub action: String,
    pub approve: String,
    pub revise: String,
    pub abort: String,
}

impl CheckpointInstructions {
    fn at(slug: &Slug, checkpoint: &PhaseDescriptor) -> Self {
        Self {
            agent: checkpoint.role,
            action: "Review and approve/revise/abort".to_string(),
            approve: format!("sq approve {}", slug),
            revise: format!("sq revise {} --to {}", slug, revision_target(checkpoint.phase)),
            abort: format!("sq abort {}", slug),
        }
    }
}

/// Result of trying to move one phase forward
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NextOutcome {
    Advanced {
        slug: Slug,
        previous_phase: Phase,
        current_phase: Phase,
        status: CheckpointStatus,
        agent: Option<&'static str>,
        next_step: NextStep,
    },
    /// Halted at a phase that needs a human decision
    Checkpoint {
        slug: Slug,
        previous_phase: Phase,
        current_phase: Phase,
        status: CheckpointStatus,
        human_checkpoint: bool,
        message: String,
        instructions: CheckpointInstructions,
    },
    /// Nothing left to advance to; nothing was written
    PipelineComplete {
        slug: Slug,
        current_phase: Phase,
        message: String,
    },
}

impl NextOutcome {
    pub fn current_phase(&self) -> Phase {
        match self {
            NextOutcome::Advanced { current_phase, .. }
            | NextOutcome::Checkpoint { current_phase, .. }
            | NextOutcome::PipelineComplete { current_phase, .. } => *current_phase,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApproveReport {
    pub approved_phase: Phase,
    #[serde(flatten)]
    pub outcome: NextOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviseReport {
    pub slug: Slug,
    pub previous_phase: Phase,
    pub target_phase: Phase,
    pub status: CheckpointStatus,
    pub agent: Option<&'static str>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbortReport {
    pub slug: Slug,
    pub previous_phase: Phase,
    pub current_phase: Phase,
    pub status: CheckpointStatus,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeReport {
    pub slug: Slug,
    pub display_name: String,
    pub current_phase: Phase,
    pub status: CheckpointStatus,
    pub agent: Option<&'static str>,
    pub human_checkpoint: bool,
    pub awaiting_decision: bool,
    pub completed_outputs: Vec<String>,
    pub agent_history: Vec<String>,
    pub next_step: NextStep,
}

/// One row of the progress view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseStatus {
    pub id: Phase,
    pub agent: Option<&'static str>,
    pub status: CheckpointStatus,
    pub human_checkpoint: bool,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub slug: Slug,
    pub display_name: String,
    pub progress_percent: u8,
    pub current_phase: Phase,
    pub checkpoint_status: CheckpointStatus,
    /// The run was aborted
    pub failed: bool,
    pub phases: Vec<PhaseStatus>,
    pub agent_history: Vec<String>,
    pub completed_outputs: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Drives runs through the pipeline on top of a [`StateStore`]
#[derive(Debug, Clone)]
pub struct WorkflowController<C: Clock = SystemClock> {
    store: StateStore<C>,
}

impl<C: Clock> WorkflowController<C> {
    pub fn new(store: StateStore<C>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &StateStore<C> {
        &self.store
    }

    /// Initialize (or restart) a run and put it in the first working phase
    pub fn start(&self, slug: &Slug, options: StartOptions) -> Result<StartReport, SquadError> {
        let init = self.store.init(slug, options)?;
        let first = PIPELINE
            .first_working()
            .map_or(PIPELINE.initial(), |d| d.phase);

        // The record was written a moment ago by init
        let outcome = self.store.update(
            slug,
            first,
            Some(CheckpointStatus::InProgress),
            UpdateOptions::forced(),
        )?;
        info!(slug = %slug, phase = %first, "started pipeline");

        Ok(StartReport {
            slug: slug.clone(),
            display_name: init.display_name,
            created: init.created,
            current_phase: first,
            status: CheckpointStatus::InProgress,
            next_step: match outcome.current.agent {
                Some(agent) => NextStep::Work {
                    agent,
                    task: format!("Execute {} phase", first),
                },
                None => NextStep::notice("Ready to advance to next phase"),
            },
        })
    }

    /// Advance one phase.
    ///
    /// A run parked at the checkpoint never advances here, forced or not.
    pub fn next(&self, slug: &Slug, force: bool) -> Result<NextOutcome, SquadError> {
        let state = self.store.read(slug)?;
        if state.awaiting_decision() {
            return Err(not_complete(&state, true));
        }
        if !state.checkpoint_status.allows_advance() && !force {
            return Err(not_complete(&state, false));
        }
        self.advance(&state, force)
    }

    /// Approve the checkpoint and move past it.
    ///
    /// `force` skips the recency guard on the approval write.
    pub fn approve(&self, slug: &Slug, force: bool) -> Result<ApproveReport, SquadError> {
        let state = self.store.read(slug)?;
        if !state.awaiting_decision() {
            return Err(SquadError::NotAtCheckpoint {
                phase: state.current_phase.to_string(),
                status: state.checkpoint_status.to_string(),
            });
        }

        let approved = self.store.update(
            slug,
            state.current_phase,
            Some(CheckpointStatus::Approved),
            UpdateOptions {
                force,
                output: None,
            },
        )?;
        info!(slug = %slug, phase = %state.current_phase, "approved checkpoint");

        // Same invocation as the approval write
        let outcome = self.advance(&approved.state, true)?;
        Ok(ApproveReport {
            approved_phase: state.current_phase,
            outcome,
        })
    }

    /// Send the run back to `target`; entries of later phases stay recorded
    pub fn revise(
        &self,
        slug: &Slug,
        target: Phase,
        force: bool,
    ) -> Result<ReviseReport, SquadError> {
        let outcome = self.store.update(
            slug,
            target,
            Some(CheckpointStatus::InProgress),
            UpdateOptions {
                force,
                output: None,
            },
        )?;
        info!(slug = %slug, from = %outcome.previous.current_phase, to = %target, "revising");

        Ok(ReviseReport {
            slug: slug.clone(),
            previous_phase: outcome.previous.current_phase,
            target_phase: target,
            status: CheckpointStatus::InProgress,
            agent: outcome.current.agent,
            message: format!("Returned to {} for revision", target),
        })
    }

    /// Move the run to the failure phase, whatever its state
    pub fn abort(&self, slug: &Slug, reason: Option<String>) -> Result<AbortReport, SquadError> {
        let reason = reason.unwrap_or_else(|| DEFAULT_ABORT_REASON.to_string());
        let recorded = reason.clone();
        let outcome = self.store.update_with(
            slug,
            Phase::Failed,
            Some(CheckpointStatus::Completed),
            UpdateOptions::forced(),
            move |state| state.metadata.abort_reason = Some(recorded),
        )?;
        info!(slug = %slug, %reason, "aborted pipeline");

        Ok(AbortReport {
            slug: slug.clone(),
            previous_phase: outcome.previous.current_phase,
            current_phase: Phase::Failed,
            status: CheckpointStatus::Completed,
            reason,
        })
    }

    pub fn resume(&self, slug: &Slug) -> Result<ResumeReport, SquadError> {
        let state = self.store.read(slug)?;
        let descriptor = PIPELINE.descriptor(state.current_phase);
        let agent = descriptor.and_then(|d| d.role);

        let next_step = if state.awaiting_decision() {
            NextStep::notice("Awaiting human decision (approve/revise/abort)")
        } else if state.is_finished() {
            NextStep::notice("Pipeline already completed")
        } else {
            match agent {
                Some(agent) => NextStep::Work {
                    agent,
                    task: format!("Continue {} phase", state.current_phase),
                },
                None => NextStep::notice("Ready to advance to next phase"),
            }
        };

        Ok(ResumeReport {
            slug: state.slug.clone(),
            display_name: state.display_name.clone(),
            current_phase: state.current_phase,
            status: state.checkpoint_status,
            agent,
            human_checkpoint: descriptor.is_some_and(|d| d.human_checkpoint),
            awaiting_decision: state.awaiting_decision(),
            next_step,
            completed_outputs: state.completed_outputs,
            agent_history: state.agent_history,
        })
    }

    /// Progress view over the tracked phases
    pub fn status(&self, slug: &Slug) -> Result<StatusReport, SquadError> {
        let state = self.store.read(slug)?;
        let failed = PIPELINE
            .descriptor(state.current_phase)
            .is_some_and(|d| d.kind == PhaseKind::Failure);
        let current = PIPELINE.tracked_index(state.current_phase);

        let phases: Vec<PhaseStatus> = PIPELINE
            .tracked()
            .enumerate()
            .map(|(idx, d)| {
                let status = if failed {
                    state
                        .phases
                        .get(&d.phase)
                        .map_or(CheckpointStatus::Pending, |r| r.status)
                } else {
                    match current {
                        Some(cur) if idx < cur => CheckpointStatus::Completed,
                        Some(cur) if idx == cur => state.checkpoint_status,
                        _ => CheckpointStatus::Pending,
                    }
                };
                PhaseStatus {
                    id: d.phase,
                    agent: d.role,
                    status,
                    human_checkpoint: d.human_checkpoint,
                    current: current == Some(idx),
                }
            })
            .collect();

        let span = phases.len().saturating_sub(1).max(1);
        let progress_percent =
            current.map_or(0, |idx| u8::try_from(idx * 100 / span).unwrap_or(100));
        debug!(slug = %slug, progress_percent, "computed status");

        Ok(StatusReport {
            slug: state.slug,
            display_name: state.display_name,
            progress_percent,
            current_phase: state.current_phase,
            checkpoint_status: state.checkpoint_status,
            failed,
            phases,
            agent_history: state.agent_history,
            completed_outputs: state.completed_outputs,
            created_at: state.created_at,
            updated_at: state.updated_at,
        })
    }

    fn advance(&self, state: &PipelineState, force: bool) -> Result<NextOutcome, SquadError> {
        let slug = &state.slug;
        let Some(next) = PIPELINE.next_after(state.current_phase) else {
            debug!(slug = %slug, phase = %state.current_phase, "nothing to advance to");
            return Ok(NextOutcome::PipelineComplete {
                slug: slug.clone(),
                current_phase: state.current_phase,
                message: "Pipeline already completed".to_string(),
            });
        };

        let status = if next.human_checkpoint {
            CheckpointStatus::Checkpoint
        } else if next.kind == PhaseKind::Terminal {
            CheckpointStatus::Completed
        } else {
            CheckpointStatus::InProgress
        };
        let outcome = self.store.update(
            slug,
            next.phase,
            Some(status),
            UpdateOptions {
                force,
                output: None,
            },
        )?;
        let previous_phase = outcome.previous.current_phase;

        if next.human_checkpoint {
            info!(slug = %slug, phase = %next.phase, "halted at human checkpoint");
            return Ok(NextOutcome::Checkpoint {
                slug: slug.clone(),
                previous_phase,
                current_phase: next.phase,
                status,
                human_checkpoint: true,
                message: format!("HUMAN CHECKPOINT: {}", next.phase),
                instructions: CheckpointInstructions::at(slug, next),
            });
        }

        Ok(NextOutcome::Advanced {
            slug: slug.clone(),
            previous_phase,
            current_phase: next.phase,
            status,
            agent: next.role,
            next_step: match next.role {
                Some(agent) => NextStep::Work {
                    agent,
                    task: format!("Execute {} phase", next.phase),
                },
                None => NextStep::notice("Pipeline completed"),
            },
        })
    }
}

fn not_complete(state: &PipelineState, awaiting_decision: bool) -> SquadError {
    SquadError::PhaseNotComplete {
        phase: state.current_phase.to_string(),
        status: state.checkpoint_status.to_string(),
        awaiting_decision,
    }
}

/// Last working phase before `checkpoint`, the usual place to send a revision
fn revision_target(checkpoint: Phase) -> Phase {
    PIPELINE
        .descriptors()
        .iter()
        .take_while(|d| d.phase != checkpoint)
        .filter(|d| d.kind == PhaseKind::Working)
        .last()
        .map_or(checkpoint, |d| d.phase)
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
