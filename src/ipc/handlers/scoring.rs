use crate::curriculum::CurriculumCatalog;
use crate::ipc::error::{engine_err, err, ok};
use crate::ipc::helpers::optional_str;
use crate::ipc::types::{AppState, Request};
use crate::model::{infer_scheme, RejectedInput, SubStrandResult};
use crate::scoring::{overall_level, tally, ScoringScheme};
use serde_json::{json, Value};

/// Scheme for a batch of entries: the catalog's for a known grade/subject/term, else an explicit
/// `params.scheme`, else whatever the entries look like.
pub(super) fn resolve_scheme(req: &Request, entries: &[Value]) -> Result<ScoringScheme, Value> {
    let grade = optional_str(req, "grade");
    let subject = optional_str(req, "subject");
    let term = req
        .params
        .get("term")
        .and_then(|v| v.as_u64())
        .and_then(|v| u8::try_from(v).ok())
        .unwrap_or(0);
    let explicit = match req.params.get("scheme").and_then(|v| v.as_str()) {
        Some(raw) => match ScoringScheme::parse(raw.trim()) {
            Some(s) => Some(s),
            None => {
                return Err(err(
                    &req.id,
                    "bad_params",
                    "scheme must be one of: descriptiveLevels, numericComposite",
                    None,
                ))
            }
        },
        None => None,
    };

    if let Some(known) = CurriculumCatalog::global().lookup(&grade, &subject, term) {
        if let Some(s) = explicit {
            if s != known.scheme {
                return Err(err(
                    &req.id,
                    "bad_params",
                    format!("{} uses {}", known.name, known.scheme.as_str()),
                    Some(json!({ "scheme": known.scheme })),
                ));
            }
        }
        return Ok(known.scheme);
    }
    Ok(explicit.unwrap_or_else(|| infer_scheme(entries)))
}

/// Parses `params.scores` under `scheme`. Clamp rejections are collected, not fatal.
pub(super) fn parse_entries(
    req: &Request,
    scheme: ScoringScheme,
) -> Result<(Vec<SubStrandResult>, Vec<RejectedInput>), Value> {
    let raw = match req.params.get("scores") {
        None | Some(Value::Null) => return Ok((Vec::new(), Vec::new())),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(err(&req.id, "bad_params", "scores must be an array", None)),
    };
    let mut rejected = Vec::new();
    let mut entries = Vec::with_capacity(raw.len());
    for item in raw {
        match SubStrandResult::from_entry(item, scheme, &mut rejected) {
            Ok(v) => entries.push(v),
            Err(e) => return Err(engine_err(&req.id, &e)),
        }
    }
    Ok((entries, rejected))
}

pub(super) fn raw_entries(req: &Request) -> &[Value] {
    req.params
        .get("scores")
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn handle_scoring_preview(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let scheme = match resolve_scheme(req, raw_entries(req)) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let (entries, rejected) = match parse_entries(req, scheme) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let overall = overall_level(scheme, &entries);
    ok(
        &req.id,
        json!({
            "scheme": scheme,
            "scores": entries,
            "overallLevel": overall,
            "overallLabel": overall.label(),
            "tally": tally(&entries),
            "rejected": rejected
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "scoring.preview" => Some(handle_scoring_preview(state, req)),
        _ => None,
    }
}
