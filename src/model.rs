use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, EngineResult};
use crate::scoring::{self, PerformanceLevel, ScoringScheme};

/// The three component scores of a numeric sub-strand. Values are already in [0,100].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericScores {
    pub cat1: Option<f64>,
    pub cat2: Option<f64>,
    pub end_term: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericComponent {
    Cat1,
    Cat2,
    EndTerm,
}

impl NumericComponent {
    pub const ALL: [NumericComponent; 3] = [
        NumericComponent::Cat1,
        NumericComponent::Cat2,
        NumericComponent::EndTerm,
    ];

    pub fn field(self) -> &'static str {
        match self {
            NumericComponent::Cat1 => "cat1",
            NumericComponent::Cat2 => "cat2",
            NumericComponent::EndTerm => "endTerm",
        }
    }
}

impl NumericScores {
    fn slot(&mut self, component: NumericComponent) -> &mut Option<f64> {
        match component {
            NumericComponent::Cat1 => &mut self.cat1,
            NumericComponent::Cat2 => &mut self.cat2,
            NumericComponent::EndTerm => &mut self.end_term,
        }
    }

    /// Applies a raw entry value. `null` clears the component; numbers are clamped into
    /// [0,100]; anything else is rejected and the component keeps its previous value.
    /// Returns whether the value was accepted.
    pub fn set_raw(&mut self, component: NumericComponent, raw: &Value) -> bool {
        if raw.is_null() {
            *self.slot(component) = None;
            return true;
        }
        match scoring::clamp_score(raw) {
            Some(v) => {
                *self.slot(component) = Some(v);
                true
            }
            None => false,
        }
    }

    pub fn composite(&self) -> Option<f64> {
        scoring::composite_average(self.cat1, self.cat2, self.end_term)
    }

    pub fn level(&self) -> PerformanceLevel {
        scoring::level_of(self.cat1, self.cat2, self.end_term)
    }
}

/// What was measured for one sub-strand. The variant fixes the scoring scheme, so a numeric
/// subject can never pick up descriptive flags or the other way round.
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    Descriptive(Option<PerformanceLevel>),
    Numeric(NumericScores),
    /// A pre-normalized 0-100 score written by older clients.
    Score(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScoreEntryWire", into = "ScoreEntryWire")]
pub struct SubStrandResult {
    pub strand_number: u32,
    pub sub_strand_name: String,
    pub measurement: Measurement,
    pub comment: Option<String>,
}

#[cfg(test)]
impl SubStrandResult {
    pub fn descriptive(
        strand_number: u32,
        sub_strand_name: &str,
        level: Option<PerformanceLevel>,
    ) -> Self {
        Self {
            strand_number,
            sub_strand_name: sub_strand_name.to_string(),
            measurement: Measurement::Descriptive(level),
            comment: None,
        }
    }

    pub fn numeric(strand_number: u32, sub_strand_name: &str, scores: NumericScores) -> Self {
        Self {
            strand_number,
            sub_strand_name: sub_strand_name.to_string(),
            measurement: Measurement::Numeric(scores),
            comment: None,
        }
    }
}

impl SubStrandResult {
    pub fn key(&self) -> (u32, &str) {
        (self.strand_number, self.sub_strand_name.as_str())
    }

    pub fn scheme(&self) -> Option<ScoringScheme> {
        match self.measurement {
            Measurement::Descriptive(_) => Some(ScoringScheme::DescriptiveLevels),
            Measurement::Numeric(_) => Some(ScoringScheme::NumericComposite),
            Measurement::Score(_) => None,
        }
    }

    /// Derived level for this sub-strand, if it has one.
    pub fn performance_level(&self) -> Option<PerformanceLevel> {
        match &self.measurement {
            Measurement::Descriptive(level) => *level,
            Measurement::Numeric(n) => Some(n.level()),
            Measurement::Score(v) => Some(PerformanceLevel::from_average(*v)),
        }
    }

    /// Numeric composite or plain score, when the entry has one.
    pub fn numeric_value(&self) -> Option<f64> {
        match &self.measurement {
            Measurement::Numeric(n) => n.composite(),
            Measurement::Score(v) => Some(*v),
            Measurement::Descriptive(_) => None,
        }
    }

    /// Parses one client-supplied score entry under `scheme`.
    ///
    /// Numeric fields go through the entry clamp; rejected fields are appended to `rejected`
    /// and left unset. Fields belonging to the other scheme are a validation error.
    pub fn from_entry(
        raw: &Value,
        scheme: ScoringScheme,
        rejected: &mut Vec<RejectedInput>,
    ) -> EngineResult<Self> {
        let Some(obj) = raw.as_object() else {
            return Err(EngineError::validation("score entries must be objects"));
        };
        let strand_number = obj
            .get("strandNumber")
            .and_then(|v| v.as_u64())
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| EngineError::validation("score entry missing strandNumber"))?;
        let sub_strand_name = obj
            .get("subStrandName")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| EngineError::validation("score entry missing subStrandName"))?;
        let comment = obj
            .get("comment")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        // Explicit nulls are treated as absent.
        let present = |field: &str| obj.get(field).is_some_and(|v| !v.is_null());
        let has_descriptive = DESCRIPTIVE_FIELDS.iter().any(|f| present(*f));
        let has_numeric = NumericComponent::ALL.iter().any(|c| present(c.field()));

        let measurement = match scheme {
            ScoringScheme::DescriptiveLevels => {
                if has_numeric {
                    return Err(EngineError::validation(format!(
                        "sub-strand {} '{}' carries numeric scores but the subject uses descriptive levels",
                        strand_number, sub_strand_name
                    )));
                }
                let mut selected: Option<PerformanceLevel> = None;
                for (field, level) in DESCRIPTIVE_FIELDS.iter().zip(PerformanceLevel::PRECEDENCE) {
                    if obj.get(*field).and_then(|v| v.as_bool()).unwrap_or(false) {
                        if selected.is_some() {
                            return Err(EngineError::validation(format!(
                                "sub-strand {} '{}' selects more than one level",
                                strand_number, sub_strand_name
                            )));
                        }
                        selected = Some(level);
                    }
                }
                Measurement::Descriptive(selected)
            }
            ScoringScheme::NumericComposite => {
                if has_descriptive {
                    return Err(EngineError::validation(format!(
                        "sub-strand {} '{}' carries descriptive levels but the subject uses numeric scores",
                        strand_number, sub_strand_name
                    )));
                }
                let mut scores = NumericScores::default();
                for component in NumericComponent::ALL {
                    let Some(v) = obj.get(component.field()) else {
                        continue;
                    };
                    if !scores.set_raw(component, v) {
                        rejected.push(RejectedInput {
                            strand_number,
                            sub_strand_name: sub_strand_name.clone(),
                            field: component.field(),
                        });
                    }
                }
                Measurement::Numeric(scores)
            }
        };

        Ok(Self {
            strand_number,
            sub_strand_name,
            measurement,
            comment,
        })
    }
}

const DESCRIPTIVE_FIELDS: [&str; 4] = ["ee", "me", "ae", "be"];

/// Guesses the scheme of a batch of raw entries: numeric if any entry has a numeric field.
pub fn infer_scheme(entries: &[Value]) -> ScoringScheme {
    let numeric = entries.iter().any(|e| {
        NumericComponent::ALL
            .iter()
            .any(|c| e.get(c.field()).is_some_and(|v| !v.is_null()))
    });
    if numeric {
        ScoringScheme::NumericComposite
    } else {
        ScoringScheme::DescriptiveLevels
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedInput {
    pub strand_number: u32,
    pub sub_strand_name: String,
    pub field: &'static str,
}

/// Stored shape of a score entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreEntryWire {
    strand_number: u32,
    sub_strand_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ee: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    me: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ae: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    be: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cat1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cat2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_term: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    perf_level: Option<PerformanceLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl TryFrom<ScoreEntryWire> for SubStrandResult {
    type Error = String;

    fn try_from(w: ScoreEntryWire) -> Result<Self, Self::Error> {
        let flags = [w.ee, w.me, w.ae, w.be];
        let has_descriptive = flags.iter().any(|f| f.is_some());
        let has_numeric =
            w.cat1.is_some() || w.cat2.is_some() || w.end_term.is_some() || w.perf_level.is_some();
        let has_score = w.score.is_some();
        if [has_descriptive, has_numeric, has_score]
            .iter()
            .filter(|b| **b)
            .count()
            > 1
        {
            return Err(format!(
                "score entry {} '{}' mixes scoring schemes",
                w.strand_number, w.sub_strand_name
            ));
        }

        let measurement = if has_numeric {
            // perfLevel is derived; recomputed from the components on read.
            Measurement::Numeric(NumericScores {
                cat1: w.cat1,
                cat2: w.cat2,
                end_term: w.end_term,
            })
        } else if let Some(v) = w.score {
            Measurement::Score(v)
        } else {
            let mut selected = None;
            for (flag, level) in flags.iter().zip(PerformanceLevel::PRECEDENCE) {
                if flag.unwrap_or(false) {
                    if selected.is_some() {
                        return Err(format!(
                            "score entry {} '{}' selects more than one level",
                            w.strand_number, w.sub_strand_name
                        ));
                    }
                    selected = Some(level);
                }
            }
            Measurement::Descriptive(selected)
        };

        Ok(SubStrandResult {
            strand_number: w.strand_number,
            sub_strand_name: w.sub_strand_name,
            measurement,
            comment: w.comment,
        })
    }
}

impl From<SubStrandResult> for ScoreEntryWire {
    fn from(r: SubStrandResult) -> Self {
        let mut w = ScoreEntryWire {
            strand_number: r.strand_number,
            sub_strand_name: r.sub_strand_name,
            comment: r.comment,
            ..Default::default()
        };
        match r.measurement {
            Measurement::Descriptive(level) => {
                w.ee = Some(level == Some(PerformanceLevel::Exceeding));
                w.me = Some(level == Some(PerformanceLevel::Meeting));
                w.ae = Some(level == Some(PerformanceLevel::Approaching));
                w.be = Some(level == Some(PerformanceLevel::Below));
            }
            Measurement::Numeric(n) => {
                w.cat1 = n.cat1;
                w.cat2 = n.cat2;
                w.end_term = n.end_term;
                w.perf_level = Some(n.level());
            }
            Measurement::Score(v) => {
                w.score = Some(v);
            }
        }
        w
    }
}

/// Composite identity of an assessment record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssessmentKey {
    pub teacher_id: String,
    pub student_id: String,
    pub grade: String,
    pub subject: String,
    pub term: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub id: String,
    pub teacher_id: String,
    #[serde(default)]
    pub teacher_name: String,
    pub student_id: String,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub admission_no: String,
    pub grade: String,
    pub subject: String,
    pub term: u8,
    #[serde(default)]
    pub school_code: String,
    #[serde(default)]
    pub scores: Vec<SubStrandResult>,
    pub created_at: String,
    pub updated_at: String,
}

impl AssessmentRecord {
    pub fn key(&self) -> AssessmentKey {
        AssessmentKey {
            teacher_id: self.teacher_id.clone(),
            student_id: self.student_id.clone(),
            grade: self.grade.clone(),
            subject: self.subject.clone(),
            term: self.term,
        }
    }

    /// Scheme implied by the stored entries, if any entry carries one.
    pub fn inferred_scheme(&self) -> Option<ScoringScheme> {
        self.scores.iter().find_map(|s| s.scheme())
    }
}

/// A save request for one assessment pass. Its `scores` replace whatever was stored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssessmentDraft {
    pub teacher_id: String,
    pub teacher_name: String,
    pub student_id: String,
    pub student_name: String,
    pub admission_no: String,
    pub grade: String,
    pub subject: String,
    pub term: u8,
    pub school_code: String,
    pub scores: Vec<SubStrandResult>,
}

impl AssessmentDraft {
    pub fn key(&self) -> AssessmentKey {
        AssessmentKey {
            teacher_id: self.teacher_id.clone(),
            student_id: self.student_id.clone(),
            grade: self.grade.clone(),
            subject: self.subject.clone(),
            term: self.term,
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        let required = [
            ("teacherId", &self.teacher_id),
            ("studentId", &self.student_id),
            ("grade", &self.grade),
            ("subject", &self.subject),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(EngineError::validation(format!("missing {}", name)));
            }
        }
        validate_term(self.term)?;

        let mut seen: HashSet<(u32, &str)> = HashSet::new();
        let mut scheme: Option<ScoringScheme> = None;
        for s in &self.scores {
            if !seen.insert(s.key()) {
                return Err(EngineError::validation(format!(
                    "duplicate score entry for sub-strand {} '{}'",
                    s.strand_number, s.sub_strand_name
                )));
            }
            if let Some(entry_scheme) = s.scheme() {
                match scheme {
                    Some(existing) if existing != entry_scheme => {
                        return Err(EngineError::validation(
                            "score entries mix descriptive and numeric scoring",
                        ));
                    }
                    _ => scheme = Some(entry_scheme),
                }
            }
        }
        Ok(())
    }
}

pub fn validate_term(term: u8) -> EngineResult<()> {
    if (1..=3).contains(&term) {
        Ok(())
    } else {
        Err(EngineError::validation("term must be 1, 2 or 3"))
    }
}

/// Identity projection of a stored record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessedStudent {
    pub student_id: String,
    pub student_name: String,
    pub admission_no: String,
}

/// Class-teacher remark printed on a student's term report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRemark {
    pub id: String,
    pub student_id: String,
    pub class_name: String,
    pub stream: String,
    pub term: u8,
    pub remark: String,
    pub updated_at: String,
}

impl ReportRemark {
    pub fn key(&self) -> (String, String, String, u8) {
        (
            self.student_id.clone(),
            self.class_name.to_ascii_lowercase(),
            self.stream.to_ascii_lowercase(),
            self.term,
        )
    }
}
