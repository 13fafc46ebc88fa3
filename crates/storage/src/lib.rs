// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable pipeline state: one JSON record per slug plus the active pointer

mod guard;
mod pointer;
mod store;

pub use guard::RecencyGuard;
pub use pointer::ActivePointer;
pub use store::{
    CurrentPosition, InitOptions, InitOutcome, ListFilter, PhasePosition, SquadList, SquadSummary,
    StateStore, UpdateOptions, UpdateOutcome,
};
