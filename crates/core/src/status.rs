// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Checkpoint status of the current phase

use crate::error::SquadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointStatus {
    Pending,
    InProgress,
    /// Awaiting human approval
    Checkpoint,
    Approved,
    Rejected,
    Completed,
}

impl CheckpointStatus {
    pub const ALL: [CheckpointStatus; 6] = [
        CheckpointStatus::Pending,
        CheckpointStatus::InProgress,
        CheckpointStatus::Checkpoint,
        CheckpointStatus::Approved,
        CheckpointStatus::Rejected,
        CheckpointStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckpointStatus::Pending => "pending",
            CheckpointStatus::InProgress => "in_progress",
            CheckpointStatus::Checkpoint => "checkpoint",
            CheckpointStatus::Approved => "approved",
            CheckpointStatus::Rejected => "rejected",
            CheckpointStatus::Completed => "completed",
        }
    }

    pub fn ids() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.as_str()).collect()
    }

    /// The phase is done and the pipeline may advance without force
    pub fn allows_advance(&self) -> bool {
        matches!(self, CheckpointStatus::Completed | CheckpointStatus::Approved)
    }
}

impl fmt::Display for CheckpointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckpointStatus {
    type Err = SquadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| SquadError::InvalidStatus {
                received: s.to_string(),
            })
    }
}
