//! Known column labels of a school-record export and tolerant matching.
//!
//! Labels are compared after [`normalize_label`], so `"학 기"`, `"학\n기"` and
//! `"학기"` are the same label.

/// Column-0 label marking the first row of the grades block.
pub const SEMESTER_LABEL: &str = "학기";

/// Column labels of the remarks block that carry subject remarks (세특).
pub static REMARK_SUBJECTS: &[&str] = &[
    "국어",
    "수학",
    "영어",
    "한국사",
    "사회",
    "과학",
    "과학탐구실험",
    "정보",
    "체육",
    "음악",
    "미술",
];

/// Column labels of the remarks block that carry activity remarks (창체).
pub static ACTIVITY_CATEGORIES: &[&str] = &["자율", "동아리", "진로", "행특", "개인"];

pub const CAREER_LABEL: &str = "진로희망";

/// Removes all whitespace, including embedded newlines, and case-folds.
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn is_semester_label(cell: &str) -> bool {
    normalize_label(cell) == SEMESTER_LABEL
}

/// One column of the grades block: accepted labels in preference order and
/// the position used when the header names none of them.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub labels: &'static [&'static str],
    pub position: usize,
}

/// Grades block header in export order.
pub static GRADE_SCHEMA: GradeSchema = GradeSchema {
    semester: ColumnSpec { labels: &["학기"], position: 0 },
    department: ColumnSpec { labels: &["교과"], position: 1 },
    subject: ColumnSpec { labels: &["과목"], position: 2 },
    credit_hours: ColumnSpec { labels: &["학점수", "이수단위", "단위수"], position: 3 },
    score: ColumnSpec { labels: &["원점수/과목평균", "원점수"], position: 4 },
    achievement: ColumnSpec { labels: &["성취도"], position: 5 },
    rank_grade: ColumnSpec { labels: &["석차등급", "등급"], position: 6 },
};

#[derive(Debug, Clone, Copy)]
pub struct GradeSchema {
    pub semester: ColumnSpec,
    pub department: ColumnSpec,
    pub subject: ColumnSpec,
    pub credit_hours: ColumnSpec,
    pub score: ColumnSpec,
    pub achievement: ColumnSpec,
    pub rank_grade: ColumnSpec,
}

/// Resolved column indices of the grades block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeColumns {
    pub semester: usize,
    pub department: usize,
    pub subject: usize,
    pub credit_hours: usize,
    pub score: usize,
    pub achievement: usize,
    pub rank_grade: usize,
}

impl GradeColumns {
    /// Locates each grades column in `header` (the sentinel row).
    pub fn resolve(header: &[Option<String>]) -> Self {
        let normalized: Vec<Option<String>> = header
            .iter()
            .map(|cell| cell.as_deref().map(normalize_label))
            .collect();

        let find = |spec: &ColumnSpec| locate(&normalized, spec).unwrap_or(spec.position);

        Self {
            semester: find(&GRADE_SCHEMA.semester),
            department: find(&GRADE_SCHEMA.department),
            subject: find(&GRADE_SCHEMA.subject),
            credit_hours: find(&GRADE_SCHEMA.credit_hours),
            score: find(&GRADE_SCHEMA.score),
            achievement: find(&GRADE_SCHEMA.achievement),
            rank_grade: find(&GRADE_SCHEMA.rank_grade),
        }
    }
}

impl Default for GradeColumns {
    fn default() -> Self {
        Self::resolve(&[])
    }
}

/// Exact match on any label first, then prefix match, so that
/// `"원점수/과목평균(표준편차)"` still resolves.
fn locate(header: &[Option<String>], spec: &ColumnSpec) -> Option<usize> {
    let labels: Vec<String> = spec.labels.iter().map(|l| normalize_label(l)).collect();

    let exact = labels.iter().find_map(|label| {
        header
            .iter()
            .position(|cell| cell.as_deref() == Some(label.as_str()))
    });

    exact.or_else(|| {
        labels.iter().find_map(|label| {
            header.iter().position(|cell| {
                cell.as_deref()
                    .is_some_and(|text| text.starts_with(label.as_str()))
            })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cells: &[&str]) -> Vec<Option<String>> {
        cells
            .iter()
            .map(|c| {
                if c.is_empty() {
                    None
                } else {
                    Some(c.to_string())
                }
            })
            .collect()
    }

    #[test]
    fn test_normalize_label_variants() {
        assert_eq!(normalize_label("학 기"), "학기");
        assert_eq!(normalize_label("학\n기"), "학기");
        assert_eq!(normalize_label(" 학\t기 "), "학기");
        assert_eq!(normalize_label("Raw Score"), "rawscore");
    }

    #[test]
    fn test_is_semester_label() {
        assert!(is_semester_label("학 기"));
        assert!(is_semester_label("학기"));
        assert!(!is_semester_label("학기말"));
        assert!(!is_semester_label("1"));
    }

    #[test]
    fn test_resolve_canonical_header() {
        let cols = GradeColumns::resolve(&header(&[
            "학 기",
            "교 과",
            "과 목",
            "학점수",
            "원점수/과목평균",
            "성취도",
            "석차등급",
        ]));
        assert_eq!(cols, GradeColumns::default());
    }

    #[test]
    fn test_resolve_reordered_and_aliased_header() {
        let cols = GradeColumns::resolve(&header(&[
            "학기",
            "과목",
            "교과",
            "석차등급",
            "이수단위",
            "원점수/과목평균(표준편차)",
            "성취도(수강자수)",
        ]));
        assert_eq!(cols.subject, 1);
        assert_eq!(cols.department, 2);
        assert_eq!(cols.rank_grade, 3);
        assert_eq!(cols.credit_hours, 4);
        assert_eq!(cols.score, 5);
        assert_eq!(cols.achievement, 6);
    }

    #[test]
    fn test_resolve_falls_back_to_position() {
        let cols = GradeColumns::resolve(&header(&["학기", "", "", "", "", "", ""]));
        assert_eq!(cols.subject, 2);
        assert_eq!(cols.rank_grade, 6);
    }
}
