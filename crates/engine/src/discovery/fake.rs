// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake output discovery for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::OutputDiscovery;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Returns a fixed set of outputs and records every directory it was asked about
#[derive(Clone, Default)]
pub struct FakeDiscovery {
    outputs: Vec<String>,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outputs<I, S>(outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            outputs: outputs.into_iter().map(Into::into).collect(),
            calls: Arc::default(),
        }
    }

    /// Directories passed to `discover`, in call order
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl OutputDiscovery for FakeDiscovery {
    fn discover(&self, squad_dir: &Path) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(squad_dir.to_path_buf());
        self.outputs.clone()
    }
}
