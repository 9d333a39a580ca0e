use std::path::PathBuf;

use rusqlite::Connection;
use serde::Deserialize;

/// One request line: `{id, method, params}`. `params` defaults to `null`.
#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Process state between requests. Both fields are set together by `workspace.select`.
#[derive(Default)]
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
}
