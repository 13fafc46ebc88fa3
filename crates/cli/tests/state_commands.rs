// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI integration tests for the record-level commands

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use common::{read_state, Workspace};
use std::fs;

#[test]
fn init_writes_record_and_pointer() {
    let ws = Workspace::new();

    let doc = ws.ok(&["init", "acme_legal", "--source-mind", "jane_doe"]);

    assert_eq!(doc["action"], "init");
    assert_eq!(doc["slug"], "acme_legal");
    assert_eq!(doc["display_name"], "Acme Legal");
    assert_eq!(doc["created"], true);
    let state = read_state(&ws.state_file("acme_legal"));
    assert_eq!(state["current_phase"], "init");
    assert_eq!(state["checkpoint_status"], "pending");
    assert_eq!(state["metadata"]["source_mind"], "jane_doe");
    assert_eq!(
        fs::read_to_string(ws.root().join(".active-squad")).unwrap(),
        "acme_legal"
    );
}

#[test]
fn init_rejects_bad_slug() {
    let ws = Workspace::new();

    let error = ws.err(&["init", "Acme-Legal"]);

    assert_eq!(error["code"], "INVALID_SLUG");
    assert_eq!(error["details"]["received"], "Acme-Legal");
    assert_eq!(error["details"]["expected_pattern"], "^[a-z0-9]+(_[a-z0-9]+)*$");
    assert!(!ws.root().join("Acme-Legal").exists());
}

#[test]
fn update_defaults_to_active_squad() {
    let ws = Workspace::unguarded();
    ws.ok(&["init", "acme"]);

    let doc = ws.ok(&["update", "--phase", "research", "--output", "sources/a.md"]);

    assert_eq!(doc["slug"], "acme");
    assert_eq!(doc["previous"]["current_phase"], "init");
    assert_eq!(doc["current"]["current_phase"], "research");
    assert_eq!(doc["current"]["checkpoint_status"], "in_progress");
    assert_eq!(doc["current"]["agent"], "oalanicolas");
    let state = read_state(&ws.state_file("acme"));
    assert_eq!(state["completed_outputs"][0], "sources/a.md");
}

#[test]
fn update_right_after_init_is_guarded() {
    let ws = Workspace::new();
    ws.ok(&["init", "acme"]);

    let error = ws.err(&["update", "acme", "--phase", "research"]);

    assert_eq!(error["code"], "CONCURRENT_MODIFICATION");
    assert_eq!(error["details"]["window_ms"], 5000);
    assert_eq!(error["details"]["hint"], "Use --force to override");

    ws.ok(&["update", "acme", "--phase", "research", "--force"]);
}

#[test]
fn update_validates_phase_and_status_first() {
    let ws = Workspace::new();

    // No record and no active squad: validation still wins
    let error = ws.err(&["update", "--phase", "deploy"]);
    assert_eq!(error["code"], "INVALID_PHASE");
    assert_eq!(error["details"]["valid_phases"].as_array().unwrap().len(), 11);

    let error = ws.err(&["update", "--phase", "research", "--status", "done"]);
    assert_eq!(error["code"], "INVALID_STATUS");
    assert_eq!(error["details"]["received"], "done");
}

#[test]
fn update_of_unknown_slug_is_not_found() {
    let ws = Workspace::new();

    let error = ws.err(&["update", "ghost", "--phase", "research"]);

    assert_eq!(error["code"], "STATE_NOT_FOUND");
    assert_eq!(error["details"]["hint"], "Run: sq init ghost");
}

#[test]
fn get_without_anything_to_resolve() {
    let ws = Workspace::new();
    let error = ws.err(&["get"]);
    assert_eq!(error["code"], "NO_ACTIVE_SQUAD");
}

#[test]
fn get_reports_corruption() {
    let ws = Workspace::new();
    ws.ok(&["init", "acme"]);
    fs::write(ws.state_file("acme"), "{ truncated").unwrap();

    let error = ws.err(&["get", "acme"]);

    assert_eq!(error["code"], "CORRUPTED_STATE");
    assert_eq!(error["details"]["hint"], "Re-initialize with: sq init acme");

    // Re-initializing recovers the record
    ws.ok(&["init", "acme"]);
    assert_eq!(ws.ok(&["get", "acme"])["current_phase"], "init");
}

#[test]
fn list_filters_and_marks_active() {
    let ws = Workspace::unguarded();
    ws.ok(&["init", "done"]);
    ws.ok(&["update", "done", "--phase", "completed", "--status", "completed"]);
    ws.ok(&["init", "running"]);

    let all = ws.ok(&["list"]);
    assert_eq!(all["filter"], "all");
    assert_eq!(all["count"], 2);

    let active = ws.ok(&["list", "--status", "active"]);
    assert_eq!(active["count"], 1);
    assert_eq!(active["squads"][0]["slug"], "running");
    assert_eq!(active["squads"][0]["is_active_squad"], true);

    let completed = ws.ok(&["list", "--status", "completed"]);
    assert_eq!(completed["squads"][0]["slug"], "done");
    assert_eq!(completed["squads"][0]["is_active_squad"], false);
}

#[test]
fn list_of_missing_root_is_empty() {
    let ws = Workspace::new();
    let doc = ws.ok(&["list"]);
    assert_eq!(doc["count"], 0);
    assert_eq!(doc["squads"].as_array().unwrap().len(), 0);
}

#[test]
fn list_rejects_unknown_filter() {
    let ws = Workspace::new();
    let error = ws.err(&["list", "--status", "paused"]);
    assert_eq!(error["code"], "INVALID_ARGUMENTS");
}
