//! Splits a school-record grid into its remarks and grades blocks and builds
//! a [`StudentRecord`].

use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::analyzers::aggregate::aggregate;
use crate::config::GradePolicy;
use crate::error::MalformedInputError;
use crate::parser::{Grid, parse_grid};
use crate::record::{CourseGrade, Semester, StudentRecord, UNDECIDED};
use crate::schema::{
    ACTIVITY_CATEGORIES, CAREER_LABEL, GradeColumns, REMARK_SUBJECTS, is_semester_label,
    normalize_label,
};

const DEFAULT_CREDIT_HOURS: f64 = 1.0;

/// Parses CSV bytes and extracts a [`StudentRecord`] from them.
///
/// # Errors
///
/// Returns [`MalformedInputError`] when the bytes hold no usable table.
pub fn extract_csv(bytes: &[u8], policy: &GradePolicy) -> Result<StudentRecord, MalformedInputError> {
    let grid = parse_grid(bytes)?;
    extract(&grid, policy)
}

/// Extracts remarks, career aspiration and course grades from `grid`, then
/// computes the averages.
///
/// A grid without a grades block is not an error: the record simply carries
/// no grades.
///
/// # Errors
///
/// Returns [`MalformedInputError`] when the grid has no rows or only empty
/// cells.
pub fn extract(grid: &Grid, policy: &GradePolicy) -> Result<StudentRecord, MalformedInputError> {
    if grid.height() == 0 {
        return Err(MalformedInputError::Empty);
    }
    if grid.is_blank() {
        return Err(MalformedInputError::Blank);
    }

    let boundary = find_grades_boundary(grid);
    let remarks_rows = &grid.rows()[..boundary.unwrap_or(grid.height())];

    let mut record = StudentRecord::default();
    extract_remarks(remarks_rows, &mut record);

    match boundary {
        Some(start) => {
            let header = &grid.rows()[start];
            let columns = GradeColumns::resolve(header);
            record.grades_by_semester = extract_grades(&grid.rows()[start + 1..], &columns);
        }
        None => warn!("No semester header row found; record has no grades"),
    }

    record.averages_by_semester = aggregate(&record.grades_by_semester, policy);

    info!(
        subject_remarks = record.subject_remarks.len(),
        activity_remarks = record.activity_remarks.len(),
        courses = record.course_count(),
        "Student record extracted"
    );
    Ok(record)
}

/// Index of the first row whose column-0 cell is the semester label.
pub fn find_grades_boundary(grid: &Grid) -> Option<usize> {
    (0..grid.height()).find(|&row| grid.cell(row, 0).is_some_and(is_semester_label))
}

fn extract_remarks(rows: &[Vec<Option<String>>], record: &mut StudentRecord) {
    let subjects: Vec<String> = REMARK_SUBJECTS.iter().map(|s| normalize_label(s)).collect();
    let activities: Vec<String> = ACTIVITY_CATEGORIES.iter().map(|s| normalize_label(s)).collect();
    let career = normalize_label(CAREER_LABEL);

    let is_known = |key: &str| key == career || subjects.iter().chain(&activities).any(|s| s == key);

    // Title or banner rows may precede the labels.
    let header_idx = rows.iter().position(|row| {
        row.iter()
            .flatten()
            .any(|cell| is_known(&normalize_label(cell)))
    });
    let Some(header_idx) = header_idx else {
        if !rows.is_empty() {
            warn!("No remark labels found above the grades block");
        }
        return;
    };
    if header_idx > 0 {
        debug!(row = header_idx, "Remarks header found below leading rows");
    }
    let header = &rows[header_idx];
    let body = &rows[header_idx + 1..];

    for (col, label) in header.iter().enumerate() {
        let Some(label) = label.as_deref() else {
            continue;
        };
        let key = normalize_label(label);

        let target = if let Some(i) = subjects.iter().position(|s| *s == key) {
            Some((&mut record.subject_remarks, REMARK_SUBJECTS[i]))
        } else if let Some(i) = activities.iter().position(|s| *s == key) {
            Some((&mut record.activity_remarks, ACTIVITY_CATEGORIES[i]))
        } else {
            None
        };

        if let Some((map, name)) = target {
            if !map.contains_key(name) {
                if let Some(text) = first_value(body, col) {
                    map.insert(name.to_string(), text.to_string());
                }
            }
        } else if key == career && record.career_aspiration == UNDECIDED {
            if let Some(text) = first_value(body, col) {
                record.career_aspiration = text.to_string();
            }
        }
    }
}

fn first_value(rows: &[Vec<Option<String>>], col: usize) -> Option<&str> {
    rows.iter().find_map(|row| row.get(col)?.as_deref())
}

fn extract_grades(
    rows: &[Vec<Option<String>>],
    columns: &GradeColumns,
) -> BTreeMap<Semester, Vec<CourseGrade>> {
    let mut grades: BTreeMap<Semester, Vec<CourseGrade>> = BTreeMap::new();

    for (offset, row) in rows.iter().enumerate() {
        match parse_course(row, columns) {
            Some(course) => grades.entry(course.semester).or_default().push(course),
            None => debug!(row = offset, "Skipping grade row without semester or subject"),
        }
    }

    grades
}

/// Builds a course from one grades row; `None` when the semester or subject
/// is missing.
pub fn parse_course(row: &[Option<String>], columns: &GradeColumns) -> Option<CourseGrade> {
    let cell = |idx: usize| row.get(idx).and_then(|c| c.as_deref());

    let semester = Semester::parse(cell(columns.semester)?)?;
    let subject = cell(columns.subject)?.to_string();

    let score = cell(columns.score).map(parse_score_cell).unwrap_or_default();
    let (achievement, enrollment) = cell(columns.achievement)
        .map(parse_achievement_cell)
        .unwrap_or((None, None));

    Some(CourseGrade {
        semester,
        department: cell(columns.department).unwrap_or_default().to_string(),
        subject,
        raw_score: score.raw.unwrap_or(0.0),
        subject_mean: score.mean,
        subject_std_dev: score.std_dev,
        achievement,
        enrollment,
        rank_grade: cell(columns.rank_grade).and_then(parse_rank_grade),
        credit_hours: cell(columns.credit_hours)
            .and_then(parse_number)
            .filter(|c| *c > 0.0)
            .unwrap_or(DEFAULT_CREDIT_HOURS),
    })
}

/// Numbers held in a `"원점수/과목평균(표준편차)"` cell such as `"92/78(10.1)"`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreCell {
    pub raw: Option<f64>,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

pub fn parse_score_cell(text: &str) -> ScoreCell {
    let mut parts = text.splitn(2, '/');
    let raw = parts.next().and_then(parse_number);

    let (mean, std_dev) = match parts.next() {
        Some(rest) => match rest.split_once('(') {
            Some((mean, tail)) => (
                parse_number(mean),
                parse_number(tail.trim_end().trim_end_matches(')')),
            ),
            None => (parse_number(rest), None),
        },
        None => (None, None),
    };

    ScoreCell { raw, mean, std_dev }
}

/// Splits `"A(120)"` into the achievement letter and the enrollment count.
pub fn parse_achievement_cell(text: &str) -> (Option<String>, Option<u32>) {
    let (letter, count) = match text.split_once('(') {
        Some((letter, tail)) => (letter, tail.trim_end().trim_end_matches(')').trim().parse().ok()),
        None => (text, None),
    };
    let letter = letter.trim();
    let letter = (!letter.is_empty()).then(|| letter.to_string());
    (letter, count)
}

/// Rank grade 1–9; anything else (blank, text, zero, out of range) is
/// ungraded.
pub fn parse_rank_grade(text: &str) -> Option<u8> {
    let value = parse_number(text)?;
    if value.fract() != 0.0 || !(1.0..=9.0).contains(&value) {
        return None;
    }
    Some(value as u8)
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
