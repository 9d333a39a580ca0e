use crate::ipc::error::{engine_err, ok};
use crate::ipc::helpers::{db_conn, optional_str, required_str, required_term};
use crate::ipc::types::{AppState, Request};
use crate::repo::{RemarkDraft, RemarkRepository};
use crate::store::SqliteStore;
use serde_json::json;

fn handle_upsert_one(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let class_name = match required_str(req, "className") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let term = match required_term(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let draft = RemarkDraft {
        student_id,
        class_name,
        stream: optional_str(req, "stream"),
        term,
        remark: optional_str(req, "remark"),
    };
    let store = SqliteStore::new(conn);
    match RemarkRepository::new(&store).upsert_one(draft) {
        Ok(saved) => ok(
            &req.id,
            json!({ "deleted": saved.is_none(), "remark": saved }),
        ),
        Err(e) => engine_err(&req.id, &e),
    }
}

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let class_name = match required_str(req, "className") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let term = match required_term(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let stream = optional_str(req, "stream");
    let store = SqliteStore::new(conn);
    match RemarkRepository::new(&store).list(&class_name, &stream, term) {
        Ok(remarks) => ok(&req.id, json!({ "remarks": remarks })),
        Err(e) => engine_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "remarks.upsertOne" => Some(handle_upsert_one(state, req)),
        "remarks.list" => Some(handle_list(state, req)),
        _ => None,
    }
}
