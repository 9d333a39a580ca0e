use crate::curriculum::CurriculumCatalog;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{required_str, required_term};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_grades(_state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({ "grades": CurriculumCatalog::global().grades() }),
    )
}

fn handle_subjects(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let grade = match required_str(req, "grade") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let subjects = CurriculumCatalog::global().subjects_offered(&grade);
    ok(&req.id, json!({ "grade": grade, "subjects": subjects }))
}

fn handle_lookup(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let grade = match required_str(req, "grade") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let subject = match required_str(req, "subject") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let term = match required_term(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match CurriculumCatalog::global().lookup(&grade, &subject, term) {
        Some(found) => ok(
            &req.id,
            json!({
                "grade": grade,
                "term": term,
                "subject": found,
                "subStrandCount": found.sub_strand_count()
            }),
        ),
        None => err(
            &req.id,
            "not_found",
            format!("{} is not offered in {} term {}", subject, grade, term),
            None,
        ),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "curriculum.grades" => Some(handle_grades(state, req)),
        "curriculum.subjects" => Some(handle_subjects(state, req)),
        "curriculum.lookup" => Some(handle_lookup(state, req)),
        _ => None,
    }
}
