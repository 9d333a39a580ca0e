use serde::{Deserialize, Serialize};

use crate::model::{Measurement, SubStrandResult};

/// Competency performance level, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerformanceLevel {
    #[serde(rename = "BE")]
    Below,
    #[serde(rename = "AE")]
    Approaching,
    #[serde(rename = "ME")]
    Meeting,
    #[serde(rename = "EE")]
    Exceeding,
}

impl PerformanceLevel {
    /// Highest first. Also the tie-break precedence for descriptive tallies.
    pub const PRECEDENCE: [PerformanceLevel; 4] = [
        PerformanceLevel::Exceeding,
        PerformanceLevel::Meeting,
        PerformanceLevel::Approaching,
        PerformanceLevel::Below,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PerformanceLevel::Exceeding => "Exceeding Expectation",
            PerformanceLevel::Meeting => "Meeting Expectation",
            PerformanceLevel::Approaching => "Approaching Expectation",
            PerformanceLevel::Below => "Below Expectation",
        }
    }

    /// Rubric points used when descriptive levels are put on a numeric axis.
    pub fn points(self) -> f64 {
        match self {
            PerformanceLevel::Exceeding => 4.0,
            PerformanceLevel::Meeting => 3.0,
            PerformanceLevel::Approaching => 2.0,
            PerformanceLevel::Below => 1.0,
        }
    }

    /// Bands a 0-100 average. Each band includes its lower edge.
    pub fn from_average(avg: f64) -> Self {
        if avg >= 75.0 {
            PerformanceLevel::Exceeding
        } else if avg >= 50.0 {
            PerformanceLevel::Meeting
        } else if avg >= 25.0 {
            PerformanceLevel::Approaching
        } else {
            PerformanceLevel::Below
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoringScheme {
    DescriptiveLevels,
    NumericComposite,
}

impl ScoringScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoringScheme::DescriptiveLevels => "descriptiveLevels",
            ScoringScheme::NumericComposite => "numericComposite",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "descriptiveLevels" => Some(ScoringScheme::DescriptiveLevels),
            "numericComposite" => Some(ScoringScheme::NumericComposite),
            _ => None,
        }
    }
}

/// Level of one numeric sub-strand. Any missing component yields BE.
pub fn level_of(cat1: Option<f64>, cat2: Option<f64>, end_term: Option<f64>) -> PerformanceLevel {
    match composite_average(cat1, cat2, end_term) {
        Some(avg) => PerformanceLevel::from_average(avg),
        None => PerformanceLevel::Below,
    }
}

pub fn composite_average(cat1: Option<f64>, cat2: Option<f64>, end_term: Option<f64>) -> Option<f64> {
    match (cat1, cat2, end_term) {
        (Some(a), Some(b), Some(c)) if a.is_finite() && b.is_finite() && c.is_finite() => {
            Some((a + b + c) / 3.0)
        }
        _ => None,
    }
}

/// Counts of each descriptive level across a set of sub-strands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelTally {
    pub ee: usize,
    pub me: usize,
    pub ae: usize,
    pub be: usize,
}

impl LevelTally {
    pub fn add(&mut self, level: PerformanceLevel) {
        match level {
            PerformanceLevel::Exceeding => self.ee += 1,
            PerformanceLevel::Meeting => self.me += 1,
            PerformanceLevel::Approaching => self.ae += 1,
            PerformanceLevel::Below => self.be += 1,
        }
    }

    pub fn count(&self, level: PerformanceLevel) -> usize {
        match level {
            PerformanceLevel::Exceeding => self.ee,
            PerformanceLevel::Meeting => self.me,
            PerformanceLevel::Approaching => self.ae,
            PerformanceLevel::Below => self.be,
        }
    }

    pub fn total(&self) -> usize {
        self.ee + self.me + self.ae + self.be
    }

    /// Modal level; ties go to the higher level. An empty tally is BE.
    pub fn modal(&self) -> PerformanceLevel {
        if self.total() == 0 {
            return PerformanceLevel::Below;
        }
        let mut best = PerformanceLevel::Below;
        let mut best_count = 0;
        for level in PerformanceLevel::PRECEDENCE {
            let n = self.count(level);
            if n > best_count {
                best = level;
                best_count = n;
            }
        }
        best
    }
}

/// Collapses every recorded sub-strand of one student/subject/term into a single level.
pub fn overall_level(scheme: ScoringScheme, results: &[SubStrandResult]) -> PerformanceLevel {
    match scheme {
        ScoringScheme::NumericComposite => {
            let averages: Vec<f64> = results
                .iter()
                .filter_map(|r| match &r.measurement {
                    Measurement::Numeric(n) => n.composite(),
                    _ => None,
                })
                .collect();
            if averages.is_empty() {
                return PerformanceLevel::Below;
            }
            let mean = averages.iter().sum::<f64>() / (averages.len() as f64);
            PerformanceLevel::from_average(mean)
        }
        ScoringScheme::DescriptiveLevels => tally(results).modal(),
    }
}

pub fn tally(results: &[SubStrandResult]) -> LevelTally {
    let mut t = LevelTally::default();
    for r in results {
        if let Measurement::Descriptive(Some(level)) = r.measurement {
            t.add(level);
        }
    }
    t
}

/// Entry-time clamp for a raw numeric field.
///
/// Numbers and numeric strings are clamped into [0,100]; anything else (including NaN and
/// infinities) is rejected with `None` so the caller leaves the stored value untouched.
pub fn clamp_score(raw: &serde_json::Value) -> Option<f64> {
    let v = match raw {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                return None;
            }
            t.parse::<f64>().ok()?
        }
        _ => return None,
    };
    if !v.is_finite() {
        return None;
    }
    Some(v.clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NumericScores;
    use serde_json::json;

    fn numeric(n: u32, name: &str, c1: f64, c2: f64, et: f64) -> SubStrandResult {
        SubStrandResult::numeric(
            n,
            name,
            NumericScores {
                cat1: Some(c1),
                cat2: Some(c2),
                end_term: Some(et),
            },
        )
    }

    fn descriptive(n: u32, name: &str, level: PerformanceLevel) -> SubStrandResult {
        SubStrandResult::descriptive(n, name, Some(level))
    }

    #[test]
    fn band_edges_are_inclusive_at_lower_bound() {
        assert_eq!(PerformanceLevel::from_average(75.0), PerformanceLevel::Exceeding);
        assert_eq!(PerformanceLevel::from_average(74.999), PerformanceLevel::Meeting);
        assert_eq!(PerformanceLevel::from_average(50.0), PerformanceLevel::Meeting);
        assert_eq!(PerformanceLevel::from_average(49.999), PerformanceLevel::Approaching);
        assert_eq!(PerformanceLevel::from_average(25.0), PerformanceLevel::Approaching);
        assert_eq!(PerformanceLevel::from_average(24.999), PerformanceLevel::Below);
        assert_eq!(PerformanceLevel::from_average(0.0), PerformanceLevel::Below);
        assert_eq!(PerformanceLevel::from_average(100.0), PerformanceLevel::Exceeding);
    }

    #[test]
    fn level_of_uses_the_mean_of_three_components() {
        assert_eq!(level_of(Some(75.0), Some(75.0), Some(75.0)), PerformanceLevel::Exceeding);
        assert_eq!(level_of(Some(100.0), Some(50.0), Some(75.0)), PerformanceLevel::Exceeding);
        assert_eq!(level_of(Some(60.0), Some(40.0), Some(50.0)), PerformanceLevel::Meeting);
        assert_eq!(level_of(Some(30.0), Some(20.0), Some(25.0)), PerformanceLevel::Approaching);
        assert_eq!(level_of(Some(0.0), Some(10.0), Some(20.0)), PerformanceLevel::Below);
    }

    #[test]
    fn level_of_with_any_missing_component_is_below() {
        assert_eq!(level_of(None, Some(100.0), Some(100.0)), PerformanceLevel::Below);
        assert_eq!(level_of(Some(100.0), None, Some(100.0)), PerformanceLevel::Below);
        assert_eq!(level_of(Some(100.0), Some(100.0), None), PerformanceLevel::Below);
        assert_eq!(level_of(Some(f64::NAN), Some(100.0), Some(100.0)), PerformanceLevel::Below);
        assert_eq!(level_of(None, None, None), PerformanceLevel::Below);
    }

    #[test]
    fn level_of_is_monotonic_over_the_score_range() {
        let mut prev = PerformanceLevel::Below;
        let mut step = 0;
        while step <= 1000 {
            let v = step as f64 / 10.0;
            let level = level_of(Some(v), Some(v), Some(v));
            assert!(level >= prev, "level dropped at {}", v);
            prev = level;
            step += 1;
        }
        assert_eq!(prev, PerformanceLevel::Exceeding);
    }

    #[test]
    fn descriptive_tie_goes_to_the_higher_level() {
        let results = vec![
            descriptive(1, "a", PerformanceLevel::Exceeding),
            descriptive(1, "b", PerformanceLevel::Meeting),
            descriptive(2, "c", PerformanceLevel::Exceeding),
            descriptive(2, "d", PerformanceLevel::Meeting),
        ];
        assert_eq!(
            overall_level(ScoringScheme::DescriptiveLevels, &results),
            PerformanceLevel::Exceeding
        );

        let results = vec![
            descriptive(1, "a", PerformanceLevel::Approaching),
            descriptive(1, "b", PerformanceLevel::Below),
        ];
        assert_eq!(
            overall_level(ScoringScheme::DescriptiveLevels, &results),
            PerformanceLevel::Approaching
        );
    }

    #[test]
    fn descriptive_mode_beats_precedence() {
        let results = vec![
            descriptive(1, "a", PerformanceLevel::Exceeding),
            descriptive(1, "b", PerformanceLevel::Approaching),
            descriptive(2, "c", PerformanceLevel::Approaching),
        ];
        assert_eq!(
            overall_level(ScoringScheme::DescriptiveLevels, &results),
            PerformanceLevel::Approaching
        );
    }

    #[test]
    fn empty_sets_fall_back_to_below() {
        assert_eq!(
            overall_level(ScoringScheme::DescriptiveLevels, &[]),
            PerformanceLevel::Below
        );
        assert_eq!(
            overall_level(ScoringScheme::NumericComposite, &[]),
            PerformanceLevel::Below
        );
        let unselected = vec![SubStrandResult::descriptive(1, "a", None)];
        assert_eq!(
            overall_level(ScoringScheme::DescriptiveLevels, &unselected),
            PerformanceLevel::Below
        );
    }

    #[test]
    fn numeric_overall_skips_incomplete_sub_strands() {
        let incomplete = SubStrandResult::numeric(
            2,
            "partial",
            NumericScores {
                cat1: Some(0.0),
                cat2: None,
                end_term: Some(0.0),
            },
        );
        let results = vec![numeric(1, "full", 80.0, 80.0, 80.0), incomplete.clone()];
        assert_eq!(
            overall_level(ScoringScheme::NumericComposite, &results),
            PerformanceLevel::Exceeding
        );
        assert_eq!(
            overall_level(ScoringScheme::NumericComposite, &[incomplete]),
            PerformanceLevel::Below
        );
    }

    #[test]
    fn numeric_overall_averages_sub_strand_means() {
        // (90+90+90)/3 = 90 and (30+30+30)/3 = 30, mean 60.
        let results = vec![
            numeric(1, "a", 90.0, 90.0, 90.0),
            numeric(1, "b", 30.0, 30.0, 30.0),
        ];
        assert_eq!(
            overall_level(ScoringScheme::NumericComposite, &results),
            PerformanceLevel::Meeting
        );
    }

    #[test]
    fn clamp_limits_and_rejects() {
        assert_eq!(clamp_score(&json!(42)), Some(42.0));
        assert_eq!(clamp_score(&json!(120)), Some(100.0));
        assert_eq!(clamp_score(&json!(-5.5)), Some(0.0));
        assert_eq!(clamp_score(&json!(" 63.5 ")), Some(63.5));
        assert_eq!(clamp_score(&json!("abc")), None);
        assert_eq!(clamp_score(&json!("")), None);
        assert_eq!(clamp_score(&json!("NaN")), None);
        assert_eq!(clamp_score(&json!(null)), None);
        assert_eq!(clamp_score(&json!(true)), None);
    }
}
