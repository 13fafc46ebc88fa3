// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON envelopes
//!
//! Every invocation prints exactly one document on stdout:
//! `{"success": true, "action": ..., ...}` or
//! `{"success": false, "error": {"code", "message", "details"}}`.

use crate::error::CliError;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Success envelope: the body's fields next to `success` and `action`
pub fn success<T: Serialize>(action: &str, body: &T) -> Result<Value, CliError> {
    let mut envelope = Map::new();
    envelope.insert("success".to_string(), Value::Bool(true));
    envelope.insert("action".to_string(), Value::String(action.to_string()));
    match serde_json::to_value(body) {
        Ok(Value::Object(fields)) => envelope.extend(fields),
        Ok(other) => {
            envelope.insert("result".to_string(), other);
        }
        Err(e) => {
            return Err(CliError {
                code: "IO_ERROR",
                message: format!("failed to encode response: {}", e),
                details: json!({ "action": action }),
            })
        }
    }
    Ok(Value::Object(envelope))
}

pub fn failure(error: &CliError) -> Value {
    json!({ "success": false, "error": error })
}

/// Print a document to stdout
pub fn emit(document: &Value) {
    match serde_json::to_string_pretty(document) {
        Ok(json) => println!("{}", json),
        Err(_) => println!("{}", document),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Body {
        slug: &'static str,
        count: usize,
    }

    #[test]
    fn success_flattens_the_body() {
        let doc = success("list", &Body { slug: "acme", count: 2 }).unwrap();
        assert_eq!(
            doc,
            json!({"success": true, "action": "list", "slug": "acme", "count": 2})
        );
    }

    #[test]
    fn non_object_bodies_are_nested() {
        let doc = success("keys", &vec!["a", "b"]).unwrap();
        assert_eq!(doc["result"], json!(["a", "b"]));
    }

    #[test]
    fn failure_wraps_the_error() {
        let doc = failure(&CliError::from(sq_core::SquadError::NoActiveSquad));
        assert_eq!(doc["success"], false);
        assert_eq!(doc["error"]["code"], "NO_ACTIVE_SQUAD");
        assert_eq!(doc["error"]["details"]["hint"], "Run: sq init <slug>");
    }
}
