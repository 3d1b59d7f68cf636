//! Averaging policy: which subjects count as "main" and how the two
//! semesters combine into the total.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::schema::normalize_label;

/// Main subjects used for the restricted averages.
pub static DEFAULT_MAIN_SUBJECTS: &[&str] = &["국어", "수학", "영어", "한국사", "사회", "과학", "정보"];

/// How the "total" averages are derived from the two semesters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalRule {
    /// Mean of the two semester averages when both are non-zero, otherwise
    /// whichever semester has data.
    #[default]
    MeanOfSemesters,
    /// Recompute every average over the courses of both semesters.
    CreditRecombined,
}

/// Stored as a JSON object on disk; every field is optional:
/// ```json
/// {
///   "main_subjects": ["국어", "수학", "영어", "통합사회", "통합과학"],
///   "total_rule": "credit_recombined"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradePolicy {
    pub main_subjects: Vec<String>,
    pub total_rule: TotalRule,
}

impl Default for GradePolicy {
    fn default() -> Self {
        Self {
            main_subjects: DEFAULT_MAIN_SUBJECTS.iter().map(|s| s.to_string()).collect(),
            total_rule: TotalRule::default(),
        }
    }
}

impl GradePolicy {
    /// Loads a policy from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read policy file {}", path.display()))?;
        let policy: GradePolicy = serde_json::from_str(&content)
            .with_context(|| format!("invalid policy file {}", path.display()))?;
        Ok(policy)
    }

    pub fn with_total_rule(mut self, total_rule: TotalRule) -> Self {
        self.total_rule = total_rule;
        self
    }

    /// Whether `subject` is one of the main subjects, compared with the same
    /// tolerant normalization as column labels.
    pub fn is_main_subject(&self, subject: &str) -> bool {
        let subject = normalize_label(subject);
        self.main_subjects
            .iter()
            .any(|main| normalize_label(main) == subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_main_subjects() {
        let policy = GradePolicy::default();
        assert!(policy.is_main_subject("국어"));
        assert!(policy.is_main_subject(" 정 보 "));
        assert!(!policy.is_main_subject("체육"));
        assert_eq!(policy.total_rule, TotalRule::MeanOfSemesters);
    }

    #[test]
    fn test_load_partial_policy_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"total_rule": "credit_recombined"}}"#).unwrap();

        let policy = GradePolicy::load(file.path()).unwrap();
        assert_eq!(policy.total_rule, TotalRule::CreditRecombined);
        assert_eq!(policy.main_subjects.len(), DEFAULT_MAIN_SUBJECTS.len());
    }

    #[test]
    fn test_load_custom_main_subjects() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"main_subjects": ["통합사회", "통합과학"]}}"#).unwrap();

        let policy = GradePolicy::load(file.path()).unwrap();
        assert!(policy.is_main_subject("통합과학"));
        assert!(!policy.is_main_subject("국어"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(GradePolicy::load("/nonexistent/policy.json").is_err());
    }
}
