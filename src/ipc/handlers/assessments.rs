use crate::curriculum::CurriculumCatalog;
use crate::ipc::error::{engine_err, err, ok};
use crate::ipc::handlers::scoring::{parse_entries, raw_entries, resolve_scheme};
use crate::ipc::handlers::setup::load_default_school_code;
use crate::ipc::helpers::{db_conn, optional_str, required_str, required_term};
use crate::ipc::types::{AppState, Request};
use crate::model::{AssessmentDraft, AssessmentKey};
use crate::repo::{AssessmentFilter, AssessmentRepository};
use crate::scoring::{overall_level, tally, ScoringScheme};
use crate::store::SqliteStore;
use serde_json::json;

fn parse_filter(req: &Request) -> Result<AssessmentFilter, serde_json::Value> {
    Ok(AssessmentFilter {
        teacher_id: required_str(req, "teacherId")?,
        grade: required_str(req, "grade")?,
        subject: required_str(req, "subject")?,
        term: required_term(req)?,
    })
}

fn handle_find(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let filter = match parse_filter(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let key = AssessmentKey {
        teacher_id: filter.teacher_id,
        student_id,
        grade: filter.grade,
        subject: filter.subject,
        term: filter.term,
    };
    let store = SqliteStore::new(conn);
    match AssessmentRepository::new(&store).find(&key) {
        Ok(record) => ok(&req.id, json!({ "record": record })),
        Err(e) => engine_err(&req.id, &e),
    }
}

fn handle_upsert(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let term = match required_term(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let scheme = match resolve_scheme(req, raw_entries(req)) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let (scores, rejected) = match parse_entries(req, scheme) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let mut school_code = optional_str(req, "schoolCode");
    if school_code.is_empty() {
        school_code = match load_default_school_code(conn) {
            Ok(v) => v,
            Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
        };
    }

    let draft = AssessmentDraft {
        teacher_id: optional_str(req, "teacherId"),
        teacher_name: optional_str(req, "teacherName"),
        student_id: optional_str(req, "studentId"),
        student_name: optional_str(req, "studentName"),
        admission_no: optional_str(req, "admissionNo"),
        grade: optional_str(req, "grade"),
        subject: optional_str(req, "subject"),
        term,
        school_code,
        scores,
    };
    if !rejected.is_empty() {
        tracing::warn!(
            student_id = %draft.student_id,
            subject = %draft.subject,
            rejected = rejected.len(),
            "non-numeric score inputs dropped"
        );
    }

    let store = SqliteStore::new(conn);
    match AssessmentRepository::new(&store).upsert(draft) {
        Ok(record) => ok(
            &req.id,
            json!({
                "record": record,
                "scheme": scheme,
                "rejected": rejected
            }),
        ),
        Err(e) => engine_err(&req.id, &e),
    }
}

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let filter = match parse_filter(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let store = SqliteStore::new(conn);
    match AssessmentRepository::new(&store).list(&filter) {
        Ok(records) => ok(&req.id, json!({ "records": records })),
        Err(e) => engine_err(&req.id, &e),
    }
}

fn handle_list_assessed(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let filter = match parse_filter(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let store = SqliteStore::new(conn);
    match AssessmentRepository::new(&store).list_assessed_students(&filter) {
        Ok(students) => ok(&req.id, json!({ "students": students })),
        Err(e) => engine_err(&req.id, &e),
    }
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let id = match required_str(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let store = SqliteStore::new(conn);
    match AssessmentRepository::new(&store).remove(&id) {
        Ok(removed) => ok(&req.id, json!({ "removed": removed })),
        Err(e) => engine_err(&req.id, &e),
    }
}

fn handle_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let id = match required_str(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let store = SqliteStore::new(conn);
    let record = match AssessmentRepository::new(&store).find_by_id(&id) {
        Ok(Some(v)) => v,
        Ok(None) => return err(&req.id, "not_found", "assessment not found", None),
        Err(e) => return engine_err(&req.id, &e),
    };

    let known = CurriculumCatalog::global().lookup(&record.grade, &record.subject, record.term);
    let scheme = known
        .map(|s| s.scheme)
        .or_else(|| record.inferred_scheme())
        .unwrap_or(ScoringScheme::DescriptiveLevels);
    let overall = overall_level(scheme, &record.scores);
    let entries: Vec<serde_json::Value> = record
        .scores
        .iter()
        .map(|s| {
            json!({
                "strandNumber": s.strand_number,
                "subStrandName": s.sub_strand_name,
                "level": s.performance_level(),
                "value": s.numeric_value()
            })
        })
        .collect();
    let coverage = known.map(|subject| {
        let assessed = record
            .scores
            .iter()
            .filter(|s| subject.has_sub_strand(s.strand_number, &s.sub_strand_name))
            .count();
        json!({ "assessed": assessed, "total": subject.sub_strand_count() })
    });

    ok(
        &req.id,
        json!({
            "id": record.id,
            "studentId": record.student_id,
            "subject": record.subject,
            "term": record.term,
            "scheme": scheme,
            "overallLevel": overall,
            "overallLabel": overall.label(),
            "tally": tally(&record.scores),
            "entries": entries,
            "coverage": coverage
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "assessments.find" => Some(handle_find(state, req)),
        "assessments.upsert" => Some(handle_upsert(state, req)),
        "assessments.list" => Some(handle_list(state, req)),
        "assessments.listAssessed" => Some(handle_list_assessed(state, req)),
        "assessments.delete" => Some(handle_delete(state, req)),
        "assessments.summary" => Some(handle_summary(state, req)),
        _ => None,
    }
}
