use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::grade::Performance;
use crate::model::record::SCHEMA_VERSION;
use crate::model::subject::Subject;
use crate::service::aggregator::aggregate;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Scalars derived from a set of subjects.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub sgpa: f64,
    pub cgpa: f64,
    pub percentage: f64,
    pub total_credits: u32,
    pub total_grade_points: u32,
}

impl Aggregate {
    pub fn rounded(&self) -> Self {
        Self {
            sgpa: round2(self.sgpa),
            cgpa: round2(self.cgpa),
            percentage: round2(self.percentage),
            ..*self
        }
    }

    pub fn performance(&self) -> Performance {
        Performance::from_sgpa(self.sgpa)
    }
}

/// Point-in-time copy of the subjects and their rounded results, taken when
/// the user asks to see results.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub subjects: Vec<Subject>,
    pub sgpa: f64,
    pub cgpa: f64,
    pub percentage: f64,
    #[serde(default)]
    pub total_credits: u32,
    #[serde(default)]
    pub total_grade_points: u32,
    #[serde(default = "Utc::now")]
    pub generated_at: DateTime<Utc>,
}

fn default_version() -> u32 {
    SCHEMA_VERSION
}

impl ResultSnapshot {
    pub fn capture(subjects: &[Subject]) -> Self {
        let summary = aggregate(subjects).rounded();
        Self {
            version: SCHEMA_VERSION,
            subjects: subjects.to_vec(),
            sgpa: summary.sgpa,
            cgpa: summary.cgpa,
            percentage: summary.percentage,
            total_credits: summary.total_credits,
            total_grade_points: summary.total_grade_points,
            generated_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> Aggregate {
        Aggregate {
            sgpa: self.sgpa,
            cgpa: self.cgpa,
            percentage: self.percentage,
            total_credits: self.total_credits,
            total_grade_points: self.total_grade_points,
        }
    }

    pub fn performance(&self) -> Performance {
        Performance::from_sgpa(self.sgpa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(53.0 / 7.0), 7.57);
        assert_eq!(round2(530.0 / 7.0), 75.71);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(8.005_000_1), 8.01);
    }

    #[test]
    fn test_capture_rounds_and_copies() {
        let subjects = vec![Subject::new("Math", 4, 8), Subject::new("Physics", 3, 7)];
        let snapshot = ResultSnapshot::capture(&subjects);

        assert_eq!(snapshot.subjects, subjects);
        assert_eq!(snapshot.sgpa, 7.57);
        assert_eq!(snapshot.cgpa, 7.57);
        assert_eq!(snapshot.percentage, 75.71);
        assert_eq!(snapshot.total_credits, 7);
        assert_eq!(snapshot.total_grade_points, 53);
        assert_eq!(snapshot.performance(), Performance::Good);
    }
}
