//! In-memory model of one uploaded student record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value stored in `career_aspiration` when the export carries none.
pub const UNDECIDED: &str = "미정";

/// Term of the school year a course belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Semester {
    #[serde(rename = "1")]
    First,
    #[serde(rename = "2")]
    Second,
}

impl Semester {
    pub const ALL: [Semester; 2] = [Semester::First, Semester::Second];

    /// Accepts exactly `"1"` or `"2"` once surrounding whitespace is removed.
    pub fn parse(cell: &str) -> Option<Self> {
        match cell.trim() {
            "1" => Some(Semester::First),
            "2" => Some(Semester::Second),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Semester::First => 1,
            Semester::Second => 2,
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}학기", self.number())
    }
}

/// Key of `averages_by_semester`: either one semester or both combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1")]
    First,
    #[serde(rename = "2")]
    Second,
    #[serde(rename = "total")]
    Total,
}

impl From<Semester> for Period {
    fn from(semester: Semester) -> Self {
        match semester {
            Semester::First => Period::First,
            Semester::Second => Period::Second,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::First => write!(f, "1학기"),
            Period::Second => write!(f, "2학기"),
            Period::Total => write!(f, "전체"),
        }
    }
}

/// One subject's result in one semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseGrade {
    pub semester: Semester,
    /// 교과 (subject group), empty when the export leaves it blank.
    pub department: String,
    pub subject: String,
    /// 원점수; 0.0 when the cell is missing or unparseable.
    pub raw_score: f64,
    pub subject_mean: Option<f64>,
    pub subject_std_dev: Option<f64>,
    /// Achievement letter (A–E) without the enrollment suffix.
    pub achievement: Option<String>,
    /// Number of students taking the course (수강자수).
    pub enrollment: Option<u32>,
    /// 석차등급 1–9; `None` means the course is not graded yet.
    pub rank_grade: Option<u8>,
    pub credit_hours: f64,
}

impl CourseGrade {
    pub fn is_graded(&self) -> bool {
        matches!(self.rank_grade, Some(1..=9))
    }
}

/// Rank-grade averages for one period. Lower is better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SemesterAverages {
    pub simple_average: f64,
    pub weighted_average: f64,
    pub main_simple_average: f64,
    pub main_weighted_average: f64,
}

/// Everything extracted from one upload, handed to presentation and
/// narrative collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub subject_remarks: BTreeMap<String, String>,
    pub activity_remarks: BTreeMap<String, String>,
    pub career_aspiration: String,
    pub grades_by_semester: BTreeMap<Semester, Vec<CourseGrade>>,
    pub averages_by_semester: BTreeMap<Period, SemesterAverages>,
}

impl Default for StudentRecord {
    fn default() -> Self {
        Self {
            subject_remarks: BTreeMap::new(),
            activity_remarks: BTreeMap::new(),
            career_aspiration: UNDECIDED.to_string(),
            grades_by_semester: BTreeMap::new(),
            averages_by_semester: BTreeMap::new(),
        }
    }
}

impl StudentRecord {
    /// Averages for `period`, zero-valued when nothing was computed.
    pub fn averages(&self, period: Period) -> SemesterAverages {
        self.averages_by_semester
            .get(&period)
            .copied()
            .unwrap_or_default()
    }

    pub fn courses(&self, semester: Semester) -> &[CourseGrade] {
        self.grades_by_semester
            .get(&semester)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn course_count(&self) -> usize {
        self.grades_by_semester.values().map(Vec::len).sum()
    }
}
