// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file-based pipeline state store
//!
//! Layout under the pipelines root:
//!
//! ```text
//! <root>/.active-squad
//! <root>/<slug>/metadata/state.json
//! ```

use crate::guard::RecencyGuard;
use crate::pointer::ActivePointer;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sq_core::error::io_at;
use sq_core::{
    CheckpointStatus, Clock, Metadata, Phase, PipelineState, Slug, SquadError, SystemClock,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub name: Option<String>,
    pub source_mind: Option<String>,
    pub target_domain: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitOutcome {
    pub slug: Slug,
    pub path: PathBuf,
    pub display_name: String,
    /// False when an existing record was restarted
    pub created: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Bypass the recency guard
    pub force: bool,
    /// Output identifier to register
    pub output: Option<String>,
}

impl UpdateOptions {
    pub fn forced() -> Self {
        Self {
            force: true,
            output: None,
        }
    }
}

/// Where a run stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhasePosition {
    pub current_phase: Phase,
    pub checkpoint_status: CheckpointStatus,
}

impl PhasePosition {
    pub fn of(state: &PipelineState) -> Self {
        Self {
            current_phase: state.current_phase,
            checkpoint_status: state.checkpoint_status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentPosition {
    #[serde(flatten)]
    pub position: PhasePosition,
    pub agent: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateOutcome {
    pub slug: Slug,
    pub previous: PhasePosition,
    pub current: CurrentPosition,
    /// The record as written
    #[serde(skip)]
    pub state: PipelineState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListFilter {
    Active,
    Completed,
    #[default]
    All,
}

impl ListFilter {
    fn matches(&self, state: &PipelineState) -> bool {
        match self {
            ListFilter::Active => !state.is_concluded(),
            ListFilter::Completed => state.is_concluded(),
            ListFilter::All => true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SquadSummary {
    pub slug: Slug,
    pub display_name: String,
    pub current_phase: Phase,
    pub checkpoint_status: CheckpointStatus,
    pub updated_at: DateTime<Utc>,
    pub is_active_squad: bool,
    pub agent_history: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SquadList {
    pub squads: Vec<SquadSummary>,
    pub count: usize,
    pub filter: ListFilter,
}

/// Persists one [`PipelineState`] per slug.
///
/// Nothing is cached: every call reads from disk.
#[derive(Debug, Clone)]
pub struct StateStore<C: Clock = SystemClock> {
    root: PathBuf,
    clock: C,
    guard: RecencyGuard,
}

impl StateStore<SystemClock> {
    /// Open a store at the given pipelines root
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::with_clock(root, SystemClock)
    }
}

impl<C: Clock> StateStore<C> {
    pub fn with_clock(root: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            root: root.into(),
            clock,
            guard: RecencyGuard::default(),
        }
    }

    pub fn with_guard(mut self, guard: RecencyGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn guard(&self) -> RecencyGuard {
        self.guard
    }

    /// Directory holding everything generated for a squad
    pub fn squad_dir(&self, slug: &Slug) -> PathBuf {
        self.root.join(slug.as_str())
    }

    pub fn state_path(&self, slug: &Slug) -> PathBuf {
        self.squad_dir(slug).join("metadata").join("state.json")
    }

    pub fn active_pointer(&self) -> ActivePointer {
        ActivePointer::under(&self.root)
    }

    /// Create a record, or restart an existing one in the initial phase.
    ///
    /// History of an existing readable record is kept. A corrupted record is
    /// replaced, which makes this the way to recover from `CORRUPTED_STATE`.
    pub fn init(&self, slug: &Slug, options: InitOptions) -> Result<InitOutcome, SquadError> {
        let now = self.clock.now();
        let (mut state, created) = match self.load(slug) {
            Ok(mut state) => {
                state.restart(now);
                (state, false)
            }
            Err(SquadError::StateNotFound { .. }) => (self.fresh(slug, &options, now), true),
            Err(SquadError::CorruptedState { reason, .. }) => {
                warn!(slug = %slug, %reason, "replacing corrupted state");
                (self.fresh(slug, &options, now), true)
            }
            Err(e) => return Err(e),
        };

        if let Some(name) = options.name {
            state.display_name = name;
        }
        if let Some(source_mind) = options.source_mind {
            state.metadata.source_mind = Some(source_mind);
        }
        if let Some(target_domain) = options.target_domain {
            state.metadata.target_domain = Some(target_domain);
        }

        self.write(&state)?;
        self.active_pointer().write(slug)?;
        info!(slug = %slug, created, "initialized pipeline");

        Ok(InitOutcome {
            slug: slug.clone(),
            path: self.state_path(slug),
            display_name: state.display_name,
            created,
        })
    }

    /// Move a run to `phase` with `status` (default `in_progress`).
    pub fn update(
        &self,
        slug: &Slug,
        phase: Phase,
        status: Option<CheckpointStatus>,
        options: UpdateOptions,
    ) -> Result<UpdateOutcome, SquadError> {
        self.update_with(slug, phase, status, options, |_| {})
    }

    /// Like [`StateStore::update`], with an extra edit applied to the record
    /// before it is written.
    pub fn update_with(
        &self,
        slug: &Slug,
        phase: Phase,
        status: Option<CheckpointStatus>,
        options: UpdateOptions,
        edit: impl FnOnce(&mut PipelineState),
    ) -> Result<UpdateOutcome, SquadError> {
        let mut state = self.load(slug)?;
        let now = self.clock.now();
        self.guard.check(slug, state.updated_at, now, options.force)?;

        let previous = PhasePosition::of(&state);
        let status = status.unwrap_or(CheckpointStatus::InProgress);
        let agent = state.enter_phase(phase, status, now);
        if let Some(output) = options.output.as_deref() {
            if !state.record_output(output) {
                debug!(slug = %slug, output, "output already registered");
            }
        }
        edit(&mut state);

        self.write(&state)?;
        self.active_pointer().write(slug)?;
        info!(
            slug = %slug,
            from = %previous.current_phase,
            to = %phase,
            %status,
            forced = options.force,
            "updated pipeline"
        );

        Ok(UpdateOutcome {
            slug: slug.clone(),
            previous,
            current: CurrentPosition {
                position: PhasePosition::of(&state),
                agent,
            },
            state,
        })
    }

    pub fn read(&self, slug: &Slug) -> Result<PipelineState, SquadError> {
        debug!(slug = %slug, "reading pipeline state");
        self.load(slug)
    }

    /// Every readable record under the root, most recently updated first.
    ///
    /// Corrupted records and directories that are not slugs are skipped.
    pub fn list(&self, filter: ListFilter) -> Result<SquadList, SquadError> {
        let mut squads = Vec::new();
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(SquadList {
                    squads,
                    count: 0,
                    filter,
                })
            }
            Err(e) => return Err(io_at(&self.root)(e)),
        };
        let active = match self.active_pointer().read() {
            Ok(active) => active,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable active pointer");
                None
            }
        };

        for entry in entries {
            let entry = entry.map_err(io_at(&self.root))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') || !entry.path().is_dir() {
                continue;
            }
            let Ok(slug) = Slug::new(name) else {
                continue;
            };
            let state = match self.load(&slug) {
                Ok(state) => state,
                Err(SquadError::StateNotFound { .. }) => continue,
                Err(e) => {
                    warn!(slug = %slug, error = %e, "skipping unreadable state");
                    continue;
                }
            };
            if !filter.matches(&state) {
                continue;
            }
            squads.push(SquadSummary {
                is_active_squad: active.as_deref() == Some(slug.as_str()),
                slug,
                display_name: state.display_name,
                current_phase: state.current_phase,
                checkpoint_status: state.checkpoint_status,
                updated_at: state.updated_at,
                agent_history: state.agent_history,
            });
        }

        squads.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        Ok(SquadList {
            count: squads.len(),
            squads,
            filter,
        })
    }

    fn fresh(&self, slug: &Slug, options: &InitOptions, now: DateTime<Utc>) -> PipelineState {
        let metadata = Metadata {
            source_mind: options.source_mind.clone(),
            target_domain: options.target_domain.clone(),
            ..Metadata::default()
        };
        PipelineState::new(slug.clone(), options.name.clone(), metadata, now)
    }

    fn load(&self, slug: &Slug) -> Result<PipelineState, SquadError> {
        let path = self.state_path(slug);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SquadError::StateNotFound {
                    slug: slug.to_string(),
                    path,
                })
            }
            Err(e) => return Err(io_at(path)(e)),
        };

        let corrupted = |reason: String| SquadError::CorruptedState {
            slug: slug.to_string(),
            path: path.clone(),
            reason,
        };
        let state: PipelineState =
            serde_json::from_str(&json).map_err(|e| corrupted(e.to_string()))?;
        if &state.slug != slug {
            return Err(corrupted(format!("record belongs to {}", state.slug)));
        }
        Ok(state)
    }

    fn write(&self, state: &PipelineState) -> Result<(), SquadError> {
        let path = self.state_path(&state.slug);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_at(dir))?;
        }
        let json = serde_json::to_string_pretty(state).map_err(|e| SquadError::Io {
            path: path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;

        // Write to a sibling then rename so readers never see a partial record
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json).map_err(io_at(&temp_path))?;
        fs::rename(&temp_path, &path).map_err(io_at(&path))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
