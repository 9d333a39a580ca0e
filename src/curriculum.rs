mod data;

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Serialize;

use crate::scoring::ScoringScheme;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubStrand {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Strand {
    pub number: u32,
    pub theme: String,
    pub sub_strands: Vec<SubStrand>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub name: String,
    pub scheme: ScoringScheme,
    pub strands: Vec<Strand>,
}

impl Subject {
    pub fn sub_strand_count(&self) -> usize {
        self.strands.iter().map(|s| s.sub_strands.len()).sum()
    }

    pub fn has_sub_strand(&self, strand_number: u32, name: &str) -> bool {
        self.strands
            .iter()
            .filter(|s| s.number == strand_number)
            .flat_map(|s| s.sub_strands.iter())
            .any(|ss| ss.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone)]
pub struct Grade {
    pub name: String,
    /// Subjects for terms 1, 2 and 3.
    pub terms: [Vec<Subject>; 3],
}

/// Read-only curriculum tree with a case-insensitive index over (grade, term, subject).
#[derive(Debug)]
pub struct CurriculumCatalog {
    grades: Vec<Grade>,
    grade_index: HashMap<String, usize>,
    subject_index: HashMap<(String, u8, String), (usize, usize)>,
}

static CATALOG: OnceLock<CurriculumCatalog> = OnceLock::new();

impl CurriculumCatalog {
    /// The process-wide catalog, built on first use.
    pub fn global() -> &'static CurriculumCatalog {
        CATALOG.get_or_init(|| CurriculumCatalog::from_grades(data::grades()))
    }

    pub fn from_grades(grades: Vec<Grade>) -> Self {
        let mut grade_index = HashMap::new();
        let mut subject_index = HashMap::new();
        for (gi, grade) in grades.iter().enumerate() {
            let grade_key = normalize(&grade.name);
            grade_index.entry(grade_key.clone()).or_insert(gi);
            for (ti, subjects) in grade.terms.iter().enumerate() {
                let term = (ti + 1) as u8;
                for (si, subject) in subjects.iter().enumerate() {
                    subject_index
                        .entry((grade_key.clone(), term, normalize(&subject.name)))
                        .or_insert((gi, si));
                }
            }
        }
        Self {
            grades,
            grade_index,
            subject_index,
        }
    }

    pub fn grades(&self) -> Vec<&str> {
        self.grades.iter().map(|g| g.name.as_str()).collect()
    }

    /// Subjects declared for term 1 of `grade`, in catalog order. Empty for unknown grades.
    pub fn subjects_offered(&self, grade: &str) -> Vec<&str> {
        let Some(gi) = self.grade_index.get(&normalize(grade)) else {
            return Vec::new();
        };
        self.grades[*gi].terms[0]
            .iter()
            .map(|s| s.name.as_str())
            .collect()
    }

    pub fn lookup(&self, grade: &str, subject: &str, term: u8) -> Option<&Subject> {
        if !(1..=3).contains(&term) {
            return None;
        }
        let (gi, si) = self
            .subject_index
            .get(&(normalize(grade), term, normalize(subject)))?;
        self.grades[*gi].terms[(term - 1) as usize].get(*si)
    }

    /// Checks the structural invariants: unique strand numbers per subject/term and unique
    /// sub-strand names per strand.
    pub fn check_invariants(&self) -> Result<(), String> {
        for grade in &self.grades {
            for (ti, subjects) in grade.terms.iter().enumerate() {
                for subject in subjects {
                    let mut numbers: Vec<u32> = subject.strands.iter().map(|s| s.number).collect();
                    numbers.sort_unstable();
                    if numbers.windows(2).any(|w| w[0] == w[1]) {
                        return Err(format!(
                            "{} term {} {}: duplicate strand number",
                            grade.name,
                            ti + 1,
                            subject.name
                        ));
                    }
                    for strand in &subject.strands {
                        let mut names: Vec<String> =
                            strand.sub_strands.iter().map(|s| normalize(&s.name)).collect();
                        names.sort();
                        if names.windows(2).any(|w| w[0] == w[1]) {
                            return Err(format!(
                                "{} term {} {} strand {}: duplicate sub-strand",
                                grade.name,
                                ti + 1,
                                subject.name,
                                strand.number
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
