// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]
#![allow(deprecated)]

use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch pipelines root, cleaned up on drop
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Root without config: the default 5s concurrency window applies
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Root whose config disables the concurrency window, so commands can
    /// follow each other immediately
    pub fn unguarded() -> Self {
        let workspace = Self::new();
        workspace.write_config("concurrency_window = \"0s\"\n");
        workspace
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("squads")
    }

    pub fn write_config(&self, content: &str) {
        fs::create_dir_all(self.root()).expect("Failed to create root");
        fs::write(self.root().join("squad.toml"), content).expect("Failed to write config");
    }

    pub fn state_file(&self, slug: &str) -> PathBuf {
        self.root().join(slug).join("metadata").join("state.json")
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("sq").expect("sq binary");
        cmd.env_remove("SQ_LOG")
            .env_remove("SQ_ROOT")
            .arg("--root")
            .arg(self.root());
        cmd
    }

    /// Run a command expected to succeed and parse its envelope
    pub fn ok(&self, args: &[&str]) -> Value {
        let output = self.cmd().args(args).output().expect("run sq");
        let doc = parse(&output.stdout);
        assert!(
            output.status.success(),
            "sq {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        assert_eq!(doc["success"], true);
        doc
    }

    /// Run a command expected to fail and return its `error` object
    pub fn err(&self, args: &[&str]) -> Value {
        let output = self.cmd().args(args).output().expect("run sq");
        assert_eq!(output.status.code(), Some(1), "sq {:?} should fail", args);
        let doc = parse(&output.stdout);
        assert_eq!(doc["success"], false);
        doc["error"].clone()
    }
}

pub fn parse(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not one JSON document ({}): {}",
            e,
            String::from_utf8_lossy(stdout)
        )
    })
}

pub fn read_state(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).expect("read state")).expect("parse state")
}
