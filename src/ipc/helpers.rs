use rusqlite::Connection;

use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};

pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

/// Trimmed string param; missing or non-string values read as empty.
pub fn optional_str(req: &Request, key: &str) -> String {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

pub fn required_term(req: &Request) -> Result<u8, serde_json::Value> {
    let Some(raw) = req.params.get("term") else {
        return Err(err(&req.id, "bad_params", "missing term", None));
    };
    raw.as_i64()
        .filter(|t| (1..=3).contains(t))
        .map(|t| t as u8)
        .ok_or_else(|| err(&req.id, "bad_params", "term must be 1, 2 or 3", None))
}

pub fn db_conn<'a>(state: &'a AppState, req: &Request) -> Result<&'a Connection, serde_json::Value> {
    state
        .db
        .as_ref()
        .ok_or_else(|| err(&req.id, "no_workspace", "select a workspace first", None))
}
