// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod context;
pub mod state;
pub mod workflow;

use crate::config::Config;
use crate::error::CliError;
use sq_engine::{Session, WorkflowController};
use sq_storage::StateStore;
use std::path::PathBuf;

/// What every command needs: the store under the chosen root and its config
pub struct Env {
    pub config: Config,
    pub store: StateStore,
}

impl Env {
    pub fn load(root: PathBuf) -> Result<Self, CliError> {
        let config = Config::load(&root)?;
        let store = StateStore::open(root).with_guard(config.guard());
        Ok(Self { config, store })
    }

    /// Explicit slug first, active pointer second
    pub fn session(&self, explicit: Option<&str>) -> Result<Session, CliError> {
        Ok(Session::resolve(explicit, &self.store.active_pointer())?)
    }

    pub fn workflow(&self) -> WorkflowController {
        WorkflowController::new(self.store.clone())
    }
}
