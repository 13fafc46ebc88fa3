// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Squad pipeline engine: the phase state machine and the per-role context

mod context;
pub mod discovery;
mod session;
mod workflow;

pub use context::{AgentProfile, ContextAssembler, SquadContext};
pub use discovery::{DirectoryScan, OutputDiscovery};
pub use session::{Session, SlugSource};
pub use workflow::{
    AbortReport, ApproveReport, CheckpointInstructions, NextOutcome, NextStep, PhaseStatus,
    ResumeReport, ReviseReport, StartOptions, StartReport, StatusReport, WorkflowController,
};

// Test support - only compiled for tests or when explicitly requested
#[cfg(test)]
pub use discovery::FakeDiscovery;
