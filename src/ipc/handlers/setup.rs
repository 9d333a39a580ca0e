use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::db_conn;
use crate::ipc::types::{AppState, Request};
use crate::report::{RankTies, ReportOptions};
use serde_json::{json, Map, Value};

#[derive(Clone, Copy)]
enum SetupSection {
    Assessments,
    Reports,
}

impl SetupSection {
    const ALL: [SetupSection; 2] = [Self::Assessments, Self::Reports];

    fn parse(s: &str) -> Option<Self> {
        match s {
            "assessments" => Some(Self::Assessments),
            "reports" => Some(Self::Reports),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Assessments => "assessments",
            Self::Reports => "reports",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::Assessments => "setup.assessments",
            Self::Reports => "setup.reports",
        }
    }
}

fn default_section(section: SetupSection) -> Value {
    match section {
        SetupSection::Assessments => json!({
            "defaultSchoolCode": ""
        }),
        SetupSection::Reports => json!({
            "rankTies": "stable",
            "unassessedPlaceholder": "—",
            "roundDecimals": 1
        }),
    }
}

fn as_object_mut(value: &mut Value) -> Result<&mut Map<String, Value>, String> {
    value
        .as_object_mut()
        .ok_or_else(|| "internal setup object must be a JSON object".to_string())
}

fn parse_i64_range(v: &Value, key: &str, min: i64, max: i64) -> Result<i64, String> {
    let n = v
        .as_i64()
        .ok_or_else(|| format!("{} must be integer", key))?;
    if !(min..=max).contains(&n) {
        return Err(format!("{} must be in {}..={}", key, min, max));
    }
    Ok(n)
}

fn parse_string_max(v: &Value, key: &str, max_len: usize) -> Result<String, String> {
    let s = v.as_str().ok_or_else(|| format!("{} must be string", key))?;
    let s = s.trim();
    if s.chars().count() > max_len {
        return Err(format!("{} length must be <= {}", key, max_len));
    }
    Ok(s.to_string())
}

fn merge_section_patch(
    section: SetupSection,
    current: &mut Value,
    patch: &Map<String, Value>,
) -> Result<(), String> {
    let obj = as_object_mut(current)?;
    for (k, v) in patch {
        match section {
            SetupSection::Assessments => match k.as_str() {
                "defaultSchoolCode" => {
                    obj.insert(k.clone(), Value::String(parse_string_max(v, k, 40)?));
                }
                _ => return Err(format!("unknown assessments field: {}", k)),
            },
            SetupSection::Reports => match k.as_str() {
                "rankTies" => {
                    let s = parse_string_max(v, k, 16)?.to_ascii_lowercase();
                    let Some(ties) = RankTies::parse(&s) else {
                        return Err("rankTies must be one of: stable, shared".into());
                    };
                    obj.insert(k.clone(), Value::String(ties.as_str().to_string()));
                }
                "unassessedPlaceholder" => {
                    obj.insert(k.clone(), Value::String(parse_string_max(v, k, 8)?));
                }
                "roundDecimals" => {
                    obj.insert(k.clone(), Value::from(parse_i64_range(v, k, 0, 3)?));
                }
                _ => return Err(format!("unknown reports field: {}", k)),
            },
        }
    }
    Ok(())
}

fn load_section(conn: &rusqlite::Connection, section: SetupSection) -> anyhow::Result<Value> {
    let mut current = default_section(section);
    if let Some(saved) = db::settings_get_json(conn, section.key())? {
        if let Some(saved_obj) = saved.as_object() {
            // Malformed saved values fall back to defaults.
            if let Err(msg) = merge_section_patch(section, &mut current, saved_obj) {
                tracing::warn!(section = section.name(), error = %msg, "ignoring saved setup");
                current = default_section(section);
            }
        }
    }
    Ok(current)
}

/// Report settings for `reports.classOpen`.
pub fn load_report_options(conn: &rusqlite::Connection) -> anyhow::Result<ReportOptions> {
    let section = load_section(conn, SetupSection::Reports)?;
    let defaults = ReportOptions::default();
    Ok(ReportOptions {
        rank_ties: section
            .get("rankTies")
            .and_then(|v| v.as_str())
            .and_then(RankTies::parse)
            .unwrap_or(defaults.rank_ties),
        round_decimals: section
            .get("roundDecimals")
            .and_then(|v| v.as_u64())
            .map(|v| v as u32)
            .unwrap_or(defaults.round_decimals),
        unassessed_placeholder: section
            .get("unassessedPlaceholder")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or(defaults.unassessed_placeholder),
    })
}

/// School code stamped on upserts that don't carry one.
pub fn load_default_school_code(conn: &rusqlite::Connection) -> anyhow::Result<String> {
    let section = load_section(conn, SetupSection::Assessments)?;
    Ok(section
        .get("defaultSchoolCode")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string())
}

fn handle_setup_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let mut out = Map::new();
    for section in SetupSection::ALL {
        match load_section(conn, section) {
            Ok(v) => {
                out.insert(section.name().to_string(), v);
            }
            Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
        }
    }
    ok(&req.id, Value::Object(out))
}

fn handle_setup_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(section_raw) = req.params.get("section").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing section", None);
    };
    let Some(section) = SetupSection::parse(section_raw) else {
        return err(&req.id, "bad_params", "unknown section", None);
    };
    let Some(patch_obj) = req.params.get("patch").and_then(|v| v.as_object()) else {
        return err(&req.id, "bad_params", "patch must be an object", None);
    };

    let mut current = match load_section(conn, section) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };
    if let Err(msg) = merge_section_patch(section, &mut current, patch_obj) {
        return err(&req.id, "bad_params", msg, None);
    }
    if let Err(e) = db::settings_set_json(conn, section.key(), &current) {
        return err(&req.id, "db_update_failed", e.to_string(), None);
    }
    tracing::info!(section = section.name(), "setup updated");
    ok(&req.id, json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "setup.get" => Some(handle_setup_get(state, req)),
        "setup.update" => Some(handle_setup_update(state, req)),
        _ => None,
    }
}
