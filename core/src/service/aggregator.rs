use crate::model::results::Aggregate;
use crate::model::subject::Subject;

/// Credit-weighted grade average over `subjects`. CGPA equals SGPA since
/// there is only ever one term. Values are not rounded here.
pub fn aggregate(subjects: &[Subject]) -> Aggregate {
    if subjects.is_empty() {
        return Aggregate::default();
    }

    // Fields are public, so hand-built subjects may be out of range.
    let total_credits = subjects
        .iter()
        .fold(0u32, |acc, s| acc.saturating_add(s.credits));
    let total_grade_points = subjects
        .iter()
        .fold(0u32, |acc, s| acc.saturating_add(s.credits.saturating_mul(s.grade)));

    if total_credits == 0 {
        return Aggregate::default();
    }

    let sgpa = total_grade_points as f64 / total_credits as f64;

    Aggregate {
        sgpa,
        cgpa: sgpa,
        percentage: sgpa * 10.0,
        total_credits,
        total_grade_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_is_all_zero() {
        let summary = aggregate(&[]);
        assert_eq!(summary, Aggregate::default());
        assert_eq!(summary.sgpa, 0.0);
        assert_eq!(summary.cgpa, 0.0);
        assert_eq!(summary.percentage, 0.0);
    }

    #[test]
    fn test_math_and_physics() {
        let subjects = vec![Subject::new("Math", 4, 8), Subject::new("Physics", 3, 7)];
        let summary = aggregate(&subjects);

        assert_eq!(summary.total_credits, 7);
        assert_eq!(summary.total_grade_points, 53);
        assert!(close(summary.sgpa, 53.0 / 7.0));
        assert_eq!(summary.cgpa, summary.sgpa);

        // Percentage comes from the unrounded sgpa.
        assert!(close(summary.percentage, summary.sgpa * 10.0));

        let rounded = summary.rounded();
        assert_eq!(rounded.sgpa, 7.57);
        assert_eq!(rounded.cgpa, 7.57);
        assert_eq!(rounded.percentage, 75.71);
    }

    #[test]
    fn test_ignores_stale_cached_points() {
        let mut subject = Subject::new("Math", 4, 8);
        subject.grade_points = 1;
        let summary = aggregate(&[subject]);
        assert_eq!(summary.total_grade_points, 32);
        assert!(close(summary.sgpa, 8.0));
    }

    #[test]
    fn test_huge_hand_built_values_do_not_overflow() {
        let mut subject = Subject::new("Math", 4, 8);
        subject.credits = u32::MAX;
        subject.grade = u32::MAX;
        let summary = aggregate(&[subject.clone(), subject]);
        assert_eq!(summary.total_credits, u32::MAX);
        assert_eq!(summary.total_grade_points, u32::MAX);
        assert!(close(summary.sgpa, 1.0));
    }

    #[test]
    fn test_weighted_not_plain_mean() {
        let subjects = vec![Subject::new("Lab", 1, 10), Subject::new("Thesis", 9, 5)];
        let summary = aggregate(&subjects);
        assert!(close(summary.sgpa, 5.5));
        assert!(close(summary.percentage, 55.0));
    }
}
