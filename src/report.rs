use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::error::EngineResult;
use crate::model::{validate_term, AssessmentRecord, Measurement, SubStrandResult};
use crate::repo::{AssessmentRepository, RemarkRepository};
use crate::roster::{Roster, RosterStudent};
use crate::scoring::PerformanceLevel;

/// How equal overall averages are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankTies {
    /// Roster order breaks ties: [90, 90, 70] ranks [1, 2, 3].
    Stable,
    /// Equal averages share a rank: [90, 90, 70] ranks [1, 1, 3].
    Shared,
}

impl RankTies {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stable" => Some(RankTies::Stable),
            "shared" => Some(RankTies::Shared),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RankTies::Stable => "stable",
            RankTies::Shared => "shared",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub rank_ties: RankTies,
    pub round_decimals: u32,
    pub unassessed_placeholder: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            rank_ties: RankTies::Stable,
            round_decimals: 1,
            unassessed_placeholder: UNRANKED.to_string(),
        }
    }
}

pub const UNRANKED: &str = "—";

/// Round half up at `decimals` places.
pub fn round_off(x: f64, decimals: u32) -> f64 {
    let f = 10f64.powi(decimals as i32);
    ((f * x) + 0.5).floor() / f
}

/// Report-level letter grade. Unassessed and zero averages are unranked.
pub fn letter_grade(avg: Option<f64>) -> &'static str {
    match avg {
        Some(v) if v >= 80.0 => "A",
        Some(v) if v >= 60.0 => "B",
        Some(v) if v >= 40.0 => "C",
        Some(v) if v > 0.0 => "D",
        _ => UNRANKED,
    }
}

/// Puts a student's measurements for one subject on a 0-100 axis.
///
/// Pre-normalized `score` values are averaged directly. Without any, every sub-strand's level
/// is averaged as 4/3/2/1 points and scaled by 25; numeric composites contribute their derived
/// level, so an incomplete one counts as BE. `None` means nothing valid was recorded.
pub fn normalized_score<'r, I>(entries: I) -> Option<f64>
where
    I: IntoIterator<Item = &'r SubStrandResult>,
{
    let entries: Vec<&SubStrandResult> = entries.into_iter().collect();
    let plain: Vec<f64> = entries
        .iter()
        .filter_map(|e| match e.measurement {
            Measurement::Score(v) => Some(v),
            _ => None,
        })
        .collect();
    if !plain.is_empty() {
        return Some(mean(&plain));
    }
    let points: Vec<f64> = entries
        .iter()
        .filter_map(|e| match &e.measurement {
            Measurement::Descriptive(Some(level)) => Some(level.points()),
            Measurement::Numeric(n) => Some(n.level().points()),
            _ => None,
        })
        .collect();
    if points.is_empty() {
        return None;
    }
    Some(mean(&points) * 25.0)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / (values.len() as f64)
}

/// 1-based ranks by value descending. Unassessed students rank after everyone with a value.
pub fn assign_ranks(values: &[Option<f64>], ties: RankTies) -> Vec<usize> {
    let key = |v: Option<f64>| v.unwrap_or(f64::NEG_INFINITY);
    let mut order: Vec<usize> = (0..values.len()).collect();
    // sort_by is stable, so equal values keep roster order.
    order.sort_by(|a, b| {
        key(values[*b])
            .partial_cmp(&key(values[*a]))
            .unwrap_or(Ordering::Equal)
    });

    let mut ranks = vec![0; values.len()];
    for (pos, idx) in order.iter().enumerate() {
        ranks[*idx] = match ties {
            RankTies::Stable => pos + 1,
            RankTies::Shared => {
                if pos > 0 && key(values[order[pos - 1]]) == key(values[*idx]) {
                    ranks[order[pos - 1]]
                } else {
                    pos + 1
                }
            }
        };
    }
    ranks
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectScore {
    pub subject: String,
    pub average: Option<f64>,
    pub display: String,
    pub grade: &'static str,
    pub record_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentReportRow {
    pub student_id: String,
    pub full_name: String,
    pub admission_no: String,
    pub subjects: Vec<SubjectScore>,
    pub assessed_subjects: usize,
    pub overall_average: Option<f64>,
    pub overall_display: String,
    pub overall_grade: &'static str,
    pub overall_level: Option<PerformanceLevel>,
    pub rank: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectStats {
    pub subject: String,
    pub average: Option<f64>,
    pub highest: Option<f64>,
    pub lowest: Option<f64>,
    pub assessed: usize,
    pub total: usize,
    pub assessed_ratio: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassReport {
    pub class_name: String,
    pub stream: String,
    pub term: u8,
    pub subjects: Vec<String>,
    pub student_count: usize,
    pub rank_ties: &'static str,
    pub rows: Vec<StudentReportRow>,
    pub subject_stats: Vec<SubjectStats>,
}

pub struct ReportAggregator<'a> {
    roster: &'a dyn Roster,
    assessments: &'a AssessmentRepository<'a>,
    remarks: Option<&'a RemarkRepository<'a>>,
}

impl<'a> ReportAggregator<'a> {
    pub fn new(roster: &'a dyn Roster, assessments: &'a AssessmentRepository<'a>) -> Self {
        Self {
            roster,
            assessments,
            remarks: None,
        }
    }

    pub fn with_remarks(mut self, remarks: &'a RemarkRepository<'a>) -> Self {
        self.remarks = Some(remarks);
        self
    }

    pub fn class_report(
        &self,
        class_name: &str,
        stream: &str,
        term: u8,
        options: &ReportOptions,
    ) -> EngineResult<ClassReport> {
        validate_term(term)?;
        let students = self.roster.active_students(class_name, stream)?;
        let subjects = self.roster.assigned_subjects(class_name, stream)?;
        let records = self.assessments.all()?;
        let term_records: Vec<&AssessmentRecord> =
            records.iter().filter(|r| r.term == term).collect();
        let remarks = match self.remarks {
            Some(repo) => repo.list(class_name, stream, term)?,
            None => Vec::new(),
        };
        let decimals = options.round_decimals;

        // Ranking, grading and stats use unrounded values; rounding is for output only.
        let mut raw_subjects: Vec<Vec<Option<f64>>> = Vec::with_capacity(students.len());
        let mut raw_overall: Vec<Option<f64>> = Vec::with_capacity(students.len());
        let mut rows: Vec<StudentReportRow> = Vec::with_capacity(students.len());
        for student in &students {
            let mut raw = Vec::with_capacity(subjects.len());
            let mut scores = Vec::with_capacity(subjects.len());
            for subject in &subjects {
                let matching: Vec<&AssessmentRecord> = term_records
                    .iter()
                    .copied()
                    .filter(|r| r.subject.eq_ignore_ascii_case(subject) && belongs_to(r, student))
                    .collect();
                let value = normalized_score(matching.iter().flat_map(|r| r.scores.iter()));
                scores.push(SubjectScore {
                    subject: subject.clone(),
                    average: value.map(|v| round_off(v, decimals)),
                    display: display(value, decimals, &options.unassessed_placeholder),
                    grade: letter_grade(value),
                    record_count: matching.len(),
                });
                raw.push(value);
            }

            let assessed: Vec<f64> = raw.iter().flatten().copied().collect();
            let overall = if assessed.is_empty() {
                None
            } else {
                Some(mean(&assessed))
            };
            let remark = remarks
                .iter()
                .find(|r| r.student_id == student.student_id)
                .map(|r| r.remark.clone());

            rows.push(StudentReportRow {
                student_id: student.student_id.clone(),
                full_name: student.full_name.clone(),
                admission_no: student.admission_no.clone(),
                subjects: scores,
                assessed_subjects: assessed.len(),
                overall_average: overall.map(|v| round_off(v, decimals)),
                overall_display: display(overall, decimals, &options.unassessed_placeholder),
                overall_grade: letter_grade(overall),
                overall_level: overall.map(PerformanceLevel::from_average),
                rank: 0,
                remark,
            });
            raw_subjects.push(raw);
            raw_overall.push(overall);
        }

        let ranks = assign_ranks(&raw_overall, options.rank_ties);
        for (row, rank) in rows.iter_mut().zip(ranks) {
            row.rank = rank;
        }

        let subject_stats = subjects
            .iter()
            .enumerate()
            .map(|(i, subject)| {
                let values: Vec<f64> = raw_subjects.iter().filter_map(|r| r[i]).collect();
                stats_for(subject, &values, rows.len(), decimals)
            })
            .collect();

        rows.sort_by_key(|r| r.rank);

        debug!(
            class_name,
            stream,
            term,
            students = rows.len(),
            subjects = subjects.len(),
            "class report built"
        );

        Ok(ClassReport {
            class_name: class_name.to_string(),
            stream: stream.to_string(),
            term,
            student_count: rows.len(),
            subjects,
            rank_ties: options.rank_ties.as_str(),
            rows,
            subject_stats,
        })
    }
}

fn belongs_to(record: &AssessmentRecord, student: &RosterStudent) -> bool {
    record.student_id == student.student_id
        || (!student.admission_no.is_empty() && record.admission_no == student.admission_no)
}

fn display(value: Option<f64>, decimals: u32, placeholder: &str) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals as usize, round_off(v, decimals)),
        None => placeholder.to_string(),
    }
}

fn stats_for(subject: &str, values: &[f64], total: usize, decimals: u32) -> SubjectStats {
    let (average, highest, lowest) = if values.is_empty() {
        (None, None, None)
    } else {
        let hi = values.iter().copied().fold(f64::MIN, f64::max);
        let lo = values.iter().copied().fold(f64::MAX, f64::min);
        (
            Some(round_off(mean(values), decimals)),
            Some(round_off(hi, decimals)),
            Some(round_off(lo, decimals)),
        )
    };
    SubjectStats {
        subject: subject.to_string(),
        average,
        highest,
        lowest,
        assessed: values.len(),
        total,
        assessed_ratio: format!("{}/{}", values.len(), total),
    }
}
