use crate::ipc::error::{engine_err, err, ok};
use crate::ipc::handlers::setup::load_report_options;
use crate::ipc::helpers::{db_conn, optional_str, required_str, required_term};
use crate::ipc::types::{AppState, Request};
use crate::report::{RankTies, ReportAggregator};
use crate::repo::{AssessmentRepository, RemarkRepository};
use crate::roster::SqliteRoster;
use crate::store::SqliteStore;
use serde_json::json;

fn handle_class_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let class_name = match required_str(req, "className") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let stream = optional_str(req, "stream");
    let term = match required_term(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let mut options = match load_report_options(conn) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };
    // Per-request override of the saved tie rule.
    if let Some(raw) = req.params.get("rankTies").and_then(|v| v.as_str()) {
        match RankTies::parse(raw.trim()) {
            Some(t) => options.rank_ties = t,
            None => {
                return err(
                    &req.id,
                    "bad_params",
                    "rankTies must be one of: stable, shared",
                    None,
                )
            }
        }
    }

    let store = SqliteStore::new(conn);
    let roster = SqliteRoster::new(conn);
    let assessments = AssessmentRepository::new(&store);
    let remarks = RemarkRepository::new(&store);
    let aggregator = ReportAggregator::new(&roster, &assessments).with_remarks(&remarks);
    match aggregator.class_report(&class_name, &stream, term, &options) {
        Ok(report) => ok(&req.id, json!(report)),
        Err(e) => engine_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "reports.classOpen" => Some(handle_class_open(state, req)),
        _ => None,
    }
}
