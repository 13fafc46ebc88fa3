// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI integration tests for the pipeline commands

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use common::{read_state, Workspace};

/// Mark the current phase completed
fn complete(ws: &Workspace, slug: &str) {
    let phase = ws.ok(&["get", slug])["current_phase"]
        .as_str()
        .unwrap()
        .to_string();
    ws.ok(&["update", slug, "--phase", &phase, "--status", "completed"]);
}

#[test]
fn start_enters_research() {
    let ws = Workspace::new();

    let doc = ws.ok(&["start", "acme_legal", "--name", "Acme Legal"]);

    assert_eq!(doc["action"], "start");
    assert_eq!(doc["current_phase"], "research");
    assert_eq!(doc["status"], "in_progress");
    assert_eq!(doc["next_step"]["agent"], "oalanicolas");
    assert_eq!(doc["next_step"]["task"], "Execute research phase");
}

#[test]
fn next_requires_a_completed_phase() {
    let ws = Workspace::unguarded();
    ws.ok(&["start", "acme"]);

    let error = ws.err(&["next"]);
    assert_eq!(error["code"], "PHASE_NOT_COMPLETE");
    assert_eq!(error["details"]["current_phase"], "research");

    complete(&ws, "acme");
    let doc = ws.ok(&["next"]);
    assert_eq!(doc["outcome"], "advanced");
    assert_eq!(doc["previous_phase"], "research");
    assert_eq!(doc["current_phase"], "source_validation");
}

#[test]
fn forced_next_skips_ahead() {
    let ws = Workspace::new();
    ws.ok(&["start", "acme"]);

    let doc = ws.ok(&["next", "acme", "--force"]);

    assert_eq!(doc["current_phase"], "source_validation");
}

#[test]
fn checkpoint_approve_flow() {
    let ws = Workspace::unguarded();
    ws.ok(&["start", "acme"]);
    ws.ok(&["update", "acme", "--phase", "task_anatomy", "--status", "completed"]);

    let halted = ws.ok(&["next", "acme"]);
    assert_eq!(halted["outcome"], "checkpoint");
    assert_eq!(halted["current_phase"], "quality_gate");
    assert_eq!(halted["human_checkpoint"], true);
    assert_eq!(halted["instructions"]["revise"], "sq revise acme --to task_anatomy");

    let blocked = ws.err(&["next", "acme", "--force"]);
    assert_eq!(blocked["code"], "PHASE_NOT_COMPLETE");
    assert_eq!(blocked["details"]["current_status"], "checkpoint");

    let resumed = ws.ok(&["resume", "acme"]);
    assert_eq!(resumed["awaiting_decision"], true);

    let approved = ws.ok(&["approve", "acme"]);
    assert_eq!(approved["action"], "approve");
    assert_eq!(approved["approved_phase"], "quality_gate");
    assert_eq!(approved["current_phase"], "integration");
    assert_eq!(approved["agent"], "squad-chief");

    let state = read_state(&ws.state_file("acme"));
    assert_eq!(state["phases"]["quality_gate"]["status"], "approved");
}

#[test]
fn approve_right_after_the_checkpoint_needs_force() {
    let ws = Workspace::new();
    ws.ok(&["start", "acme"]);
    ws.ok(&["update", "acme", "--phase", "task_anatomy", "--status", "completed", "--force"]);
    ws.ok(&["next", "acme", "--force"]);

    let error = ws.err(&["approve", "acme"]);
    assert_eq!(error["code"], "CONCURRENT_MODIFICATION");

    let approved = ws.ok(&["approve", "acme", "--force"]);
    assert_eq!(approved["approved_phase"], "quality_gate");
    assert_eq!(approved["current_phase"], "integration");
}

#[test]
fn approve_outside_checkpoint() {
    let ws = Workspace::new();
    ws.ok(&["start", "acme"]);

    let error = ws.err(&["approve"]);

    assert_eq!(error["code"], "NOT_AT_CHECKPOINT");
    assert_eq!(error["details"]["current_status"], "in_progress");
}

#[test]
fn revise_returns_to_an_earlier_phase() {
    let ws = Workspace::unguarded();
    ws.ok(&["start", "acme"]);
    ws.ok(&["update", "acme", "--phase", "quality_gate", "--status", "checkpoint"]);

    let doc = ws.ok(&["revise", "acme", "--to", "task_anatomy"]);

    assert_eq!(doc["target_phase"], "task_anatomy");
    assert_eq!(doc["agent"], "pedro-valerio");
    assert_eq!(doc["message"], "Returned to task_anatomy for revision");
    let state = read_state(&ws.state_file("acme"));
    assert_eq!(state["current_phase"], "task_anatomy");
    assert_eq!(state["phases"]["quality_gate"]["status"], "checkpoint");
}

#[test]
fn revise_validates_target() {
    let ws = Workspace::new();
    ws.ok(&["start", "acme"]);

    let error = ws.err(&["revise", "acme", "--to", "deploy"]);
    assert_eq!(error["code"], "INVALID_PHASE");

    let error = ws.err(&["revise", "acme"]);
    assert_eq!(error["code"], "INVALID_ARGUMENTS");
}

#[test]
fn abort_is_final() {
    let ws = Workspace::new();
    ws.ok(&["start", "acme"]);

    let doc = ws.ok(&["abort", "acme", "--reason", "sources unusable"]);
    assert_eq!(doc["current_phase"], "failed");
    assert_eq!(doc["reason"], "sources unusable");

    let next = ws.ok(&["next", "acme"]);
    assert_eq!(next["outcome"], "pipeline_complete");

    let status = ws.ok(&["status", "acme"]);
    assert_eq!(status["failed"], true);
    assert_eq!(status["progress_percent"], 0);

    let state = read_state(&ws.state_file("acme"));
    assert_eq!(state["metadata"]["abort_reason"], "sources unusable");
    assert_eq!(ws.ok(&["list", "--status", "completed"])["count"], 1);
}

#[test]
fn status_at_quality_gate_is_62_percent() {
    let ws = Workspace::new();
    ws.ok(&["init", "acme_legal", "--name", "Acme Legal"]);
    for phase in [
        "research",
        "source_validation",
        "dna_extraction",
        "agent_scaffolding",
        "task_anatomy",
    ] {
        ws.ok(&["update", "acme_legal", "--phase", phase, "--force"]);
    }
    ws.ok(&[
        "update",
        "acme_legal",
        "--phase",
        "quality_gate",
        "--status",
        "checkpoint",
        "--force",
    ]);

    let doc = ws.ok(&["status"]);

    assert_eq!(doc["progress_percent"], 62);
    assert_eq!(doc["display_name"], "Acme Legal");
    let phases = doc["phases"].as_array().unwrap();
    assert_eq!(phases.len(), 9);
    let statuses: Vec<&str> = phases
        .iter()
        .map(|p| p["status"].as_str().unwrap())
        .collect();
    assert_eq!(
        statuses,
        vec![
            "completed",
            "completed",
            "completed",
            "completed",
            "completed",
            "checkpoint",
            "pending",
            "pending",
            "pending",
        ]
    );
    assert_eq!(phases[5]["current"], true);
    assert_eq!(phases[5]["human_checkpoint"], true);
}

#[test]
fn full_pipeline_through_the_cli() {
    let ws = Workspace::unguarded();
    ws.ok(&["start", "acme"]);

    loop {
        complete(&ws, "acme");
        let doc = ws.ok(&["next", "acme"]);
        match doc["outcome"].as_str().unwrap() {
            "checkpoint" => {
                ws.ok(&["approve", "acme"]);
            }
            "advanced" if doc["current_phase"] == "completed" => break,
            "advanced" => {}
            other => panic!("unexpected outcome {}", other),
        }
    }

    let status = ws.ok(&["status", "acme"]);
    assert_eq!(status["progress_percent"], 100);
    assert_eq!(
        status["agent_history"],
        serde_json::json!(["oalanicolas", "pedro-valerio", "squad-chief"])
    );
    assert_eq!(ws.ok(&["list", "--status", "active"])["count"], 0);
}
