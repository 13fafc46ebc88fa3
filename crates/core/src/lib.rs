// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sq-core: Core types for the squad creation pipeline
//!
//! This crate provides:
//! - The canonical phase table shared by the controller and the context assembler
//! - The persisted pipeline record and its pure mutations
//! - The role registry and the error taxonomy

pub mod clock;
pub mod error;
pub mod phase;
pub mod role;
pub mod slug;
pub mod state;
pub mod status;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use error::{Result, SquadError};
pub use phase::{Phase, PhaseDescriptor, PhaseKind, PipelineDefinition, PIPELINE};
pub use role::{RoleDescriptor, RoleRegistry};
pub use slug::Slug;
pub use state::{Metadata, PhaseRecord, PipelineState};
pub use status::CheckpointStatus;
