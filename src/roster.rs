use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterStudent {
    pub student_id: String,
    pub full_name: String,
    pub admission_no: String,
    pub sort_order: i64,
}

/// Read path to class rosters. The engine never writes through this.
pub trait Roster {
    /// Active students of a class/stream, in roster order.
    fn active_students(&self, class_name: &str, stream: &str) -> EngineResult<Vec<RosterStudent>>;

    /// Subjects taught to a class/stream, in roster order.
    fn assigned_subjects(&self, class_name: &str, stream: &str) -> EngineResult<Vec<String>>;
}

pub struct SqliteRoster<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteRoster<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl Roster for SqliteRoster<'_> {
    fn active_students(&self, class_name: &str, stream: &str) -> EngineResult<Vec<RosterStudent>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, full_name, admission_no, sort_order
             FROM roster_students
             WHERE class_name = ? COLLATE NOCASE
               AND stream = ? COLLATE NOCASE
               AND status = 'active'
             ORDER BY sort_order",
        )?;
        let rows = stmt
            .query_map((class_name, stream), |r| {
                Ok(RosterStudent {
                    student_id: r.get(0)?,
                    full_name: r.get(1)?,
                    admission_no: r.get(2)?,
                    sort_order: r.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn assigned_subjects(&self, class_name: &str, stream: &str) -> EngineResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT subject
             FROM roster_subjects
             WHERE class_name = ? COLLATE NOCASE
               AND stream = ? COLLATE NOCASE
             ORDER BY sort_order",
        )?;
        let rows = stmt
            .query_map((class_name, stream), |r| r.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// One student row handed to `roster.import`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStudent {
    #[serde(default)]
    pub student_id: Option<String>,
    pub full_name: String,
    #[serde(default)]
    pub admission_no: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub students: usize,
    pub active: usize,
    pub subjects: usize,
}

/// Replaces the roster of one class/stream in a single transaction.
pub fn replace_class(
    conn: &mut Connection,
    class_name: &str,
    stream: &str,
    students: &[ImportStudent],
    subjects: &[String],
) -> EngineResult<ImportSummary> {
    if class_name.trim().is_empty() {
        return Err(EngineError::validation("missing className"));
    }
    for s in students {
        if s.full_name.trim().is_empty() {
            return Err(EngineError::validation("student fullName must not be empty"));
        }
    }

    let tx = conn.transaction()?;
    tx.execute(
        "DELETE FROM roster_students WHERE class_name = ? COLLATE NOCASE AND stream = ? COLLATE NOCASE",
        (class_name, stream),
    )?;
    tx.execute(
        "DELETE FROM roster_subjects WHERE class_name = ? COLLATE NOCASE AND stream = ? COLLATE NOCASE",
        (class_name, stream),
    )?;

    let mut active = 0;
    for (i, s) in students.iter().enumerate() {
        let id = s
            .student_id
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let status = s
            .status
            .as_deref()
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "active".to_string());
        if status == "active" {
            active += 1;
        }
        tx.execute(
            "INSERT INTO roster_students(id, class_name, stream, full_name, admission_no, status, sort_order)
             VALUES(?, ?, ?, ?, ?, ?, ?)",
            (
                &id,
                class_name,
                stream,
                s.full_name.trim(),
                s.admission_no.trim(),
                &status,
                i as i64,
            ),
        )?;
    }

    let mut subject_count = 0;
    for subject in subjects {
        let name = subject.trim();
        if name.is_empty() {
            continue;
        }
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO roster_subjects(class_name, stream, subject, sort_order)
             VALUES(?, ?, ?, ?)",
            (class_name, stream, name, subject_count as i64),
        )?;
        subject_count += inserted;
    }
    tx.commit()?;

    Ok(ImportSummary {
        students: students.len(),
        active,
        subjects: subject_count,
    })
}
