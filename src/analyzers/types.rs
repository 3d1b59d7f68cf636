//! Data types produced by the insight pass.

use serde::Serialize;

/// Change between the two semesters' weighted averages.
///
/// Positive values mean the second semester is better, since a lower rank
/// grade is a better result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    pub overall: f64,
    pub main_subjects: f64,
}

impl Trend {
    pub fn improved(&self) -> bool {
        self.overall > 0.0
    }

    pub fn main_improved(&self) -> bool {
        self.main_subjects > 0.0
    }
}

/// Rule-based observations derived from a [`crate::record::StudentRecord`]
/// without any external service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    /// `None` unless both semesters have graded courses.
    pub trend: Option<Trend>,
    /// Subjects whose remark uses praise vocabulary (우수, 탁월, 뛰어난).
    pub strength_subjects: Vec<String>,
    /// Subject remarks long enough to carry information.
    pub notable_remarks: Vec<(String, String)>,
    /// Activity remarks long enough to carry information.
    pub notable_activities: Vec<(String, String)>,
    /// At least three activity categories carry a remark.
    pub broad_participation: bool,
}
