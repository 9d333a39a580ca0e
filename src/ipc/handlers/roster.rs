use crate::ipc::error::{engine_err, err, ok};
use crate::ipc::helpers::{db_conn, optional_str, required_str};
use crate::ipc::types::{AppState, Request};
use crate::roster::{replace_class, ImportStudent, Roster, SqliteRoster};
use serde_json::json;

fn handle_import(state: &mut AppState, req: &Request) -> serde_json::Value {
    let class_name = match required_str(req, "className") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let stream = optional_str(req, "stream");
    let students: Vec<ImportStudent> = match req.params.get("students") {
        Some(v) => match serde_json::from_value(v.clone()) {
            Ok(v) => v,
            Err(e) => return err(&req.id, "bad_params", format!("students: {}", e), None),
        },
        None => Vec::new(),
    };
    let subjects: Vec<String> = match req.params.get("subjects") {
        Some(v) => match serde_json::from_value(v.clone()) {
            Ok(v) => v,
            Err(e) => return err(&req.id, "bad_params", format!("subjects: {}", e), None),
        },
        None => Vec::new(),
    };

    let Some(conn) = state.db.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match replace_class(conn, &class_name, &stream, &students, &subjects) {
        Ok(summary) => {
            tracing::info!(
                class_name = %class_name,
                stream = %stream,
                students = summary.students,
                subjects = summary.subjects,
                "roster imported"
            );
            ok(&req.id, json!(summary))
        }
        Err(e) => engine_err(&req.id, &e),
    }
}

fn handle_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let class_name = match required_str(req, "className") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let stream = optional_str(req, "stream");
    let roster = SqliteRoster::new(conn);
    let students = match roster.active_students(&class_name, &stream) {
        Ok(v) => v,
        Err(e) => return engine_err(&req.id, &e),
    };
    let subjects = match roster.assigned_subjects(&class_name, &stream) {
        Ok(v) => v,
        Err(e) => return engine_err(&req.id, &e),
    };
    ok(
        &req.id,
        json!({
            "className": class_name,
            "stream": stream,
            "students": students,
            "subjects": subjects
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "roster.import" => Some(handle_import(state, req)),
        "roster.open" => Some(handle_open(state, req)),
        _ => None,
    }
}
