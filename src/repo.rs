use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::model::{
    validate_term, AssessedStudent, AssessmentDraft, AssessmentKey, AssessmentRecord,
    ReportRemark,
};
use crate::store::{Collection, RecordStore};

pub const ASSESSMENTS_KEY: &str = "assessments";
pub const REMARKS_KEY: &str = "remarks";

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentFilter {
    pub teacher_id: String,
    pub grade: String,
    pub subject: String,
    pub term: u8,
}

impl AssessmentFilter {
    fn matches(&self, r: &AssessmentRecord) -> bool {
        r.teacher_id == self.teacher_id
            && r.grade == self.grade
            && r.subject == self.subject
            && r.term == self.term
    }
}

pub struct AssessmentRepository<'s> {
    records: Collection<'s, AssessmentRecord>,
}

impl<'s> AssessmentRepository<'s> {
    pub fn new(store: &'s dyn RecordStore) -> Self {
        Self {
            records: Collection::new(store, ASSESSMENTS_KEY),
        }
    }

    pub fn all(&self) -> EngineResult<Vec<AssessmentRecord>> {
        self.records.read_all()
    }

    pub fn find(&self, key: &AssessmentKey) -> EngineResult<Option<AssessmentRecord>> {
        self.records.find_by(AssessmentRecord::key, key)
    }

    pub fn find_by_id(&self, id: &str) -> EngineResult<Option<AssessmentRecord>> {
        self.records.find_by(|r| r.id.clone(), &id.to_string())
    }

    pub fn upsert(&self, draft: AssessmentDraft) -> EngineResult<AssessmentRecord> {
        self.upsert_at(draft, Utc::now())
    }

    /// Saves one assessment pass. An existing record under the same composite key keeps its
    /// id and `createdAt`; its scores are replaced wholesale by the draft's.
    pub fn upsert_at(
        &self,
        draft: AssessmentDraft,
        now: DateTime<Utc>,
    ) -> EngineResult<AssessmentRecord> {
        draft.validate()?;
        let key = draft.key();
        let stamp = timestamp(now);
        let saved = self
            .records
            .upsert_by(AssessmentRecord::key, &key, |existing| {
                let (id, created_at) = match existing {
                    Some(prev) => (prev.id.clone(), prev.created_at.clone()),
                    None => (Uuid::new_v4().to_string(), stamp.clone()),
                };
                AssessmentRecord {
                    id,
                    teacher_id: draft.teacher_id,
                    teacher_name: draft.teacher_name,
                    student_id: draft.student_id,
                    student_name: draft.student_name,
                    admission_no: draft.admission_no,
                    grade: draft.grade,
                    subject: draft.subject,
                    term: draft.term,
                    school_code: draft.school_code,
                    scores: draft.scores,
                    created_at,
                    updated_at: stamp.clone(),
                }
            })?;
        info!(
            id = %saved.id,
            student_id = %saved.student_id,
            subject = %saved.subject,
            term = saved.term,
            scores = saved.scores.len(),
            "assessment saved"
        );
        Ok(saved)
    }

    pub fn list(&self, filter: &AssessmentFilter) -> EngineResult<Vec<AssessmentRecord>> {
        validate_term(filter.term)?;
        Ok(self
            .records
            .read_all()?
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect())
    }

    pub fn list_assessed_students(
        &self,
        filter: &AssessmentFilter,
    ) -> EngineResult<Vec<AssessedStudent>> {
        let rows = self
            .list(filter)?
            .into_iter()
            .map(|r| AssessedStudent {
                student_id: r.student_id,
                student_name: r.student_name,
                admission_no: r.admission_no,
            })
            .collect::<Vec<_>>();
        debug!(count = rows.len(), "listed assessed students");
        Ok(rows)
    }

    pub fn remove(&self, id: &str) -> EngineResult<bool> {
        let removed = self.records.remove_where(|r| r.id == id)?;
        if removed > 0 {
            info!(id, "assessment removed");
        }
        Ok(removed > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemarkDraft {
    pub student_id: String,
    pub class_name: String,
    pub stream: String,
    pub term: u8,
    pub remark: String,
}

pub struct RemarkRepository<'s> {
    remarks: Collection<'s, ReportRemark>,
}

impl<'s> RemarkRepository<'s> {
    pub fn new(store: &'s dyn RecordStore) -> Self {
        Self {
            remarks: Collection::new(store, REMARKS_KEY),
        }
    }

    /// Saves the remark for one student/class/term. A blank remark deletes the entry, so the
    /// result is `None` in that case.
    pub fn upsert_one(&self, draft: RemarkDraft) -> EngineResult<Option<ReportRemark>> {
        if draft.student_id.trim().is_empty() {
            return Err(EngineError::validation("missing studentId"));
        }
        if draft.class_name.trim().is_empty() {
            return Err(EngineError::validation("missing className"));
        }
        validate_term(draft.term)?;

        let key = (
            draft.student_id.clone(),
            draft.class_name.to_ascii_lowercase(),
            draft.stream.to_ascii_lowercase(),
            draft.term,
        );
        let text = draft.remark.trim().to_string();
        if text.is_empty() {
            self.remarks.remove_where(|r| r.key() == key)?;
            return Ok(None);
        }

        let stamp = timestamp(Utc::now());
        let saved = self.remarks.upsert_by(ReportRemark::key, &key, |existing| ReportRemark {
            id: existing
                .map(|r| r.id.clone())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            student_id: draft.student_id,
            class_name: draft.class_name,
            stream: draft.stream,
            term: draft.term,
            remark: text,
            updated_at: stamp,
        })?;
        Ok(Some(saved))
    }

    pub fn list(&self, class_name: &str, stream: &str, term: u8) -> EngineResult<Vec<ReportRemark>> {
        Ok(self
            .remarks
            .read_all()?
            .into_iter()
            .filter(|r| {
                r.class_name.eq_ignore_ascii_case(class_name)
                    && r.stream.eq_ignore_ascii_case(stream)
                    && r.term == term
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NumericScores, SubStrandResult};
    use crate::scoring::PerformanceLevel;
    use crate::store::memory::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).single().expect("time")
    }

    fn draft(student: &str, scores: Vec<SubStrandResult>) -> AssessmentDraft {
        AssessmentDraft {
            teacher_id: "tch-1".into(),
            teacher_name: "A. Otieno".into(),
            student_id: student.into(),
            student_name: format!("Student {}", student),
            admission_no: format!("ADM-{}", student),
            grade: "Grade 1".into(),
            subject: "Mathematics Activities".into(),
            term: 1,
            school_code: "SCH-01".into(),
            scores,
        }
    }

    fn filter() -> AssessmentFilter {
        AssessmentFilter {
            teacher_id: "tch-1".into(),
            grade: "Grade 1".into(),
            subject: "Mathematics Activities".into(),
            term: 1,
        }
    }

    #[test]
    fn upsert_is_idempotent_for_identical_input() {
        let store = MemoryStore::default();
        let repo = AssessmentRepository::new(&store);
        let scores = vec![
            SubStrandResult::descriptive(1, "Addition", Some(PerformanceLevel::Meeting)),
            SubStrandResult::descriptive(2, "Length", Some(PerformanceLevel::Exceeding)),
        ];

        let first = repo.upsert_at(draft("s1", scores.clone()), t0()).expect("first");
        let second = repo
            .upsert_at(draft("s1", scores.clone()), t0() + Duration::seconds(30))
            .expect("second");

        let all = repo.all().expect("all");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].scores, scores);
        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at > first.updated_at);
    }

    #[test]
    fn upsert_replaces_scores_instead_of_merging() {
        let store = MemoryStore::default();
        let repo = AssessmentRepository::new(&store);
        repo.upsert_at(
            draft(
                "s1",
                vec![
                    SubStrandResult::descriptive(1, "Addition", Some(PerformanceLevel::Below)),
                    SubStrandResult::descriptive(1, "Whole numbers", Some(PerformanceLevel::Below)),
                ],
            ),
            t0(),
        )
        .expect("first");

        let replacement = vec![SubStrandResult::descriptive(
            2,
            "Mass",
            Some(PerformanceLevel::Meeting),
        )];
        repo.upsert_at(draft("s1", replacement.clone()), t0() + Duration::minutes(1))
            .expect("second");

        let found = repo
            .find(&draft("s1", Vec::new()).key())
            .expect("find")
            .expect("record");
        assert_eq!(found.scores, replacement);
    }

    #[test]
    fn different_keys_create_separate_records() {
        let store = MemoryStore::default();
        let repo = AssessmentRepository::new(&store);
        repo.upsert_at(draft("s1", Vec::new()), t0()).expect("s1");
        repo.upsert_at(draft("s2", Vec::new()), t0()).expect("s2");
        let mut other_term = draft("s1", Vec::new());
        other_term.term = 2;
        repo.upsert_at(other_term, t0()).expect("s1 term 2");
        assert_eq!(repo.all().expect("all").len(), 3);
    }

    #[test]
    fn invalid_draft_writes_nothing() {
        let store = MemoryStore::default();
        let repo = AssessmentRepository::new(&store);
        let mut d = draft("", Vec::new());
        d.student_id = String::new();
        let err = repo.upsert_at(d, t0()).expect_err("missing studentId");
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(*store.writes.borrow(), 0);
        assert!(store.raw(ASSESSMENTS_KEY).is_none());
    }

    #[test]
    fn find_misses_are_none() {
        let store = MemoryStore::default();
        let repo = AssessmentRepository::new(&store);
        assert!(repo.find(&draft("nobody", Vec::new()).key()).expect("find").is_none());
    }

    #[test]
    fn list_assessed_students_projects_identity_fields() {
        let store = MemoryStore::default();
        let repo = AssessmentRepository::new(&store);
        assert!(repo.list_assessed_students(&filter()).expect("empty").is_empty());

        repo.upsert_at(draft("s1", Vec::new()), t0()).expect("s1");
        repo.upsert_at(draft("s2", Vec::new()), t0()).expect("s2");
        let mut other_teacher = draft("s3", Vec::new());
        other_teacher.teacher_id = "tch-2".into();
        repo.upsert_at(other_teacher, t0()).expect("s3");

        let listed = repo.list_assessed_students(&filter()).expect("list");
        assert_eq!(
            listed,
            vec![
                AssessedStudent {
                    student_id: "s1".into(),
                    student_name: "Student s1".into(),
                    admission_no: "ADM-s1".into(),
                },
                AssessedStudent {
                    student_id: "s2".into(),
                    student_name: "Student s2".into(),
                    admission_no: "ADM-s2".into(),
                },
            ]
        );
    }

    #[test]
    fn remove_deletes_whole_record_by_id() {
        let store = MemoryStore::default();
        let repo = AssessmentRepository::new(&store);
        let numeric = SubStrandResult::numeric(
            1,
            "Addition",
            NumericScores {
                cat1: Some(50.0),
                cat2: Some(60.0),
                end_term: Some(70.0),
            },
        );
        let saved = repo.upsert_at(draft("s1", vec![numeric]), t0()).expect("save");
        assert!(repo.remove(&saved.id).expect("remove"));
        assert!(!repo.remove(&saved.id).expect("remove again"));
        assert!(repo.all().expect("all").is_empty());
    }

    #[test]
    fn last_writer_wins_for_same_key() {
        let store = MemoryStore::default();
        let a = AssessmentRepository::new(&store);
        let b = AssessmentRepository::new(&store);
        a.upsert_at(
            draft(
                "s1",
                vec![SubStrandResult::descriptive(1, "Addition", Some(PerformanceLevel::Below))],
            ),
            t0(),
        )
        .expect("a");
        b.upsert_at(
            draft(
                "s1",
                vec![SubStrandResult::descriptive(1, "Addition", Some(PerformanceLevel::Exceeding))],
            ),
            t0() + Duration::seconds(1),
        )
        .expect("b");
        let found = a.find(&draft("s1", Vec::new()).key()).expect("find").expect("record");
        assert_eq!(
            found.scores[0].performance_level(),
            Some(PerformanceLevel::Exceeding)
        );
    }

    #[test]
    fn remarks_upsert_one_and_blank_clears() {
        let store = MemoryStore::default();
        let repo = RemarkRepository::new(&store);
        let d = RemarkDraft {
            student_id: "s1".into(),
            class_name: "Grade 4".into(),
            stream: "East".into(),
            term: 1,
            remark: "Works hard.".into(),
        };
        let first = repo.upsert_one(d.clone()).expect("save").expect("remark");
        let second = repo
            .upsert_one(RemarkDraft {
                remark: "Excellent progress.".into(),
                class_name: "grade 4".into(),
                ..d.clone()
            })
            .expect("save again")
            .expect("remark");
        assert_eq!(first.id, second.id);
        let listed = repo.list("GRADE 4", "east", 1).expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].remark, "Excellent progress.");

        assert!(repo
            .upsert_one(RemarkDraft {
                remark: "   ".into(),
                ..d
            })
            .expect("clear")
            .is_none());
        assert!(repo.list("Grade 4", "East", 1).expect("list").is_empty());
    }
}
