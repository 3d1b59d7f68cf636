use crate::analyzers::utility::{mean, weighted_mean};
use crate::config::{GradePolicy, TotalRule};
use crate::record::{CourseGrade, Period, Semester, SemesterAverages};
use std::collections::BTreeMap;
use tracing::debug;

/// Computes the averages of every period from the extracted courses.
///
/// Ungraded courses are filtered here as well, so callers may pass rows
/// straight from the export. Always yields entries for both semesters and
/// the total, zero-valued where there is no data.
pub fn aggregate(
    grades_by_semester: &BTreeMap<Semester, Vec<CourseGrade>>,
    policy: &GradePolicy,
) -> BTreeMap<Period, SemesterAverages> {
    let mut averages = BTreeMap::new();

    for semester in Semester::ALL {
        let courses = grades_by_semester
            .get(&semester)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        averages.insert(Period::from(semester), semester_averages(courses, policy));
    }

    let total = match policy.total_rule {
        TotalRule::MeanOfSemesters => mean_of_semesters(
            &averages[&Period::First],
            &averages[&Period::Second],
        ),
        TotalRule::CreditRecombined => {
            let all: Vec<CourseGrade> = grades_by_semester.values().flatten().cloned().collect();
            semester_averages(&all, policy)
        }
    };
    averages.insert(Period::Total, total);

    debug!(rule = ?policy.total_rule, total = ?total, "Averages computed");
    averages
}

/// Simple and credit-weighted rank-grade averages over one set of courses.
pub fn semester_averages(courses: &[CourseGrade], policy: &GradePolicy) -> SemesterAverages {
    let graded: Vec<(f64, f64, bool)> = courses
        .iter()
        .filter_map(|course| {
            let grade = course.rank_grade.filter(|_| course.is_graded())?;
            Some((
                f64::from(grade),
                course.credit_hours,
                policy.is_main_subject(&course.subject),
            ))
        })
        .collect();

    let all: Vec<(f64, f64)> = graded.iter().map(|&(g, c, _)| (g, c)).collect();
    let main: Vec<(f64, f64)> = graded
        .iter()
        .filter(|(_, _, is_main)| *is_main)
        .map(|&(g, c, _)| (g, c))
        .collect();

    SemesterAverages {
        simple_average: simple(&all),
        weighted_average: weighted_mean(&all),
        main_simple_average: simple(&main),
        main_weighted_average: weighted_mean(&main),
    }
}

fn simple(pairs: &[(f64, f64)]) -> f64 {
    let grades: Vec<f64> = pairs.iter().map(|(g, _)| *g).collect();
    mean(&grades)
}

/// Averages each metric of the two semesters, falling back to the single
/// non-zero side.
fn mean_of_semesters(first: &SemesterAverages, second: &SemesterAverages) -> SemesterAverages {
    SemesterAverages {
        simple_average: combine(first.simple_average, second.simple_average),
        weighted_average: combine(first.weighted_average, second.weighted_average),
        main_simple_average: combine(first.main_simple_average, second.main_simple_average),
        main_weighted_average: combine(first.main_weighted_average, second.main_weighted_average),
    }
}

fn combine(first: f64, second: f64) -> f64 {
    match (first > 0.0, second > 0.0) {
        (true, true) => (first + second) / 2.0,
        (true, false) => first,
        (false, true) => second,
        (false, false) => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(semester: Semester, subject: &str, grade: Option<u8>, credits: f64) -> CourseGrade {
        CourseGrade {
            semester,
            department: String::new(),
            subject: subject.to_string(),
            raw_score: 0.0,
            subject_mean: None,
            subject_std_dev: None,
            achievement: None,
            enrollment: None,
            rank_grade: grade,
            credit_hours: credits,
        }
    }

    fn by_semester(courses: Vec<CourseGrade>) -> BTreeMap<Semester, Vec<CourseGrade>> {
        let mut map: BTreeMap<Semester, Vec<CourseGrade>> = BTreeMap::new();
        for c in courses {
            map.entry(c.semester).or_default().push(c);
        }
        map
    }

    #[test]
    fn test_simple_and_weighted_average() {
        let courses = vec![
            course(Semester::First, "국어", Some(2), 1.0),
            course(Semester::First, "수학", Some(4), 3.0),
        ];
        let avg = semester_averages(&courses, &GradePolicy::default());
        assert_eq!(avg.weighted_average, 3.5);
        assert_eq!(avg.simple_average, 3.0);
    }

    #[test]
    fn test_main_subject_average_excludes_other_subjects() {
        let courses = vec![
            course(Semester::First, "국어", Some(2), 1.0),
            course(Semester::First, "체육", Some(1), 1.0),
        ];
        let avg = semester_averages(&courses, &GradePolicy::default());
        assert_eq!(avg.main_simple_average, 2.0);
        assert_eq!(avg.main_weighted_average, 2.0);
        assert_eq!(avg.simple_average, 1.5);
    }

    #[test]
    fn test_ungraded_courses_never_count() {
        let courses = vec![
            course(Semester::First, "국어", Some(2), 1.0),
            course(Semester::First, "수학", Some(0), 4.0),
            course(Semester::First, "영어", None, 4.0),
        ];
        let avg = semester_averages(&courses, &GradePolicy::default());
        assert_eq!(avg.simple_average, 2.0);
        assert_eq!(avg.weighted_average, 2.0);
        assert_eq!(avg.main_weighted_average, 2.0);
    }

    #[test]
    fn test_empty_semester_is_zero() {
        let avg = semester_averages(&[], &GradePolicy::default());
        assert_eq!(avg, SemesterAverages::default());

        let all = aggregate(&BTreeMap::new(), &GradePolicy::default());
        assert_eq!(all.len(), 3);
        assert_eq!(all[&Period::Total].weighted_average, 0.0);
    }

    #[test]
    fn test_total_is_mean_of_semester_averages() {
        let grades = by_semester(vec![
            course(Semester::First, "국어", Some(2), 1.0),
            course(Semester::Second, "국어", Some(4), 1.0),
            course(Semester::Second, "수학", Some(4), 5.0),
        ]);
        let all = aggregate(&grades, &GradePolicy::default());
        assert_eq!(all[&Period::First].simple_average, 2.0);
        assert_eq!(all[&Period::Second].simple_average, 4.0);
        assert_eq!(all[&Period::Total].simple_average, 3.0);
        assert_eq!(all[&Period::Total].weighted_average, 3.0);
    }

    #[test]
    fn test_total_falls_back_to_single_semester() {
        let grades = by_semester(vec![course(Semester::Second, "수학", Some(3), 2.0)]);
        let all = aggregate(&grades, &GradePolicy::default());
        assert_eq!(all[&Period::First], SemesterAverages::default());
        assert_eq!(all[&Period::Total], all[&Period::Second]);
    }

    #[test]
    fn test_total_credit_recombined() {
        let grades = by_semester(vec![
            course(Semester::First, "국어", Some(2), 1.0),
            course(Semester::Second, "국어", Some(4), 1.0),
            course(Semester::Second, "수학", Some(4), 2.0),
        ]);
        let policy = GradePolicy::default().with_total_rule(TotalRule::CreditRecombined);
        let all = aggregate(&grades, &policy);
        assert_eq!(all[&Period::Total].weighted_average, 3.5);
        assert!((all[&Period::Total].simple_average - 10.0 / 3.0).abs() < 1e-12);
    }
}
