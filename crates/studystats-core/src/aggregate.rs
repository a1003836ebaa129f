use crate::model::{CourseStats, SessionRecord};

/// Fold a user's session records for one course into course-level stats.
///
/// The average is weighted by each session's module count:
/// `Σ(modules_i × score_i) / Σ modules_i`. When the module sum is zero the
/// average is defined as exactly `0.0` rather than NaN; an empty record set
/// therefore yields all zeros. The caller supplies the records, this
/// function never touches storage.
pub fn course_stats<I>(records: I) -> CourseStats
where
    I: IntoIterator<Item = SessionRecord>,
{
    let mut time_studied: u64 = 0;
    let mut total_modules_studied: u64 = 0;
    let mut weighted_score: f64 = 0.0;

    for record in records {
        time_studied += record.time_studied;
        total_modules_studied += record.total_modules_studied;
        weighted_score += record.total_modules_studied as f64 * record.average_score;
    }

    let average_score = if total_modules_studied == 0 {
        0.0
    } else {
        weighted_score / total_modules_studied as f64
    };

    CourseStats {
        time_studied,
        total_modules_studied,
        average_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CourseScope;
    use crate::model::NewSessionStats;
    use uuid::Uuid;

    fn record(scope: &CourseScope, modules: u64, score: f64, time: u64) -> SessionRecord {
        SessionRecord::new(
            scope,
            NewSessionStats {
                session_id: Uuid::new_v4(),
                total_modules_studied: modules,
                average_score: score,
                time_studied: time,
            },
        )
    }

    #[test]
    fn weighted_average() {
        let scope = CourseScope::new(Uuid::new_v4(), Uuid::new_v4());
        let records = vec![
            record(&scope, 2, 30.0, 100),
            record(&scope, 4, 40.0, 200),
            record(&scope, 8, 85.0, 300),
        ];

        let stats = course_stats(records);
        assert_eq!(stats.total_modules_studied, 14);
        assert_eq!(stats.time_studied, 600);
        let expected = (2.0 * 30.0 + 4.0 * 40.0 + 8.0 * 85.0) / 14.0;
        assert!((stats.average_score - expected).abs() < 1e-9);
    }

    #[test]
    fn empty_set_yields_zeros() {
        let stats = course_stats(Vec::new());
        assert_eq!(stats, CourseStats::zero());
    }

    #[test]
    fn zero_modules_yields_zero_average_not_nan() {
        let scope = CourseScope::new(Uuid::new_v4(), Uuid::new_v4());
        let stats = course_stats(vec![record(&scope, 0, 90.0, 500)]);
        assert_eq!(stats.time_studied, 500);
        assert_eq!(stats.total_modules_studied, 0);
        assert_eq!(stats.average_score, 0.0);
    }

    #[test]
    fn single_record_average_is_its_own_score() {
        let scope = CourseScope::new(Uuid::new_v4(), Uuid::new_v4());
        let stats = course_stats(vec![record(&scope, 5, 72.5, 60)]);
        assert!((stats.average_score - 72.5).abs() < 1e-9);
    }
}
