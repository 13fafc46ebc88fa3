// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Discovery of outputs already generated for a squad

mod scan;

#[cfg(test)]
mod fake;

pub use scan::{DirectoryScan, DEFAULT_CATEGORIES};

#[cfg(test)]
pub use fake::FakeDiscovery;

use std::path::Path;

/// Best-effort listing of outputs under a squad directory.
///
/// Implementations never fail: anything unreadable is simply absent from the
/// result.
pub trait OutputDiscovery {
    /// Output identifiers of the form `<category>/<entry>`
    fn discover(&self, squad_dir: &Path) -> Vec<String>;
}
