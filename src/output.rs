//! Output formatting and persistence for extracted records.
//!
//! Supports pretty-printing, JSON serialization, a Markdown report and a
//! per-course CSV export.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

use crate::analyzers::types::Insights;
use crate::record::{CourseGrade, Period, StudentRecord};
use csv::WriterBuilder;

/// Writes a record using Rust's debug pretty-print format.
pub fn write_pretty<W: Write>(mut out: W, record: &StudentRecord) -> Result<()> {
    writeln!(out, "{:#?}", record)?;
    Ok(())
}

/// Writes a record as pretty-printed JSON.
pub fn write_json<W: Write>(mut out: W, record: &StudentRecord) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, record)?;
    writeln!(out)?;
    Ok(())
}

/// Prints a record to stdout using Rust's debug pretty-print format.
pub fn print_pretty(record: &StudentRecord) -> Result<()> {
    write_pretty(io::stdout().lock(), record)?;
    debug!(courses = record.course_count(), "Record printed");
    Ok(())
}

/// Prints a record to stdout as pretty-printed JSON.
pub fn print_json(record: &StudentRecord) -> Result<()> {
    write_json(io::stdout().lock(), record)?;
    debug!(courses = record.course_count(), "Record printed as JSON");
    Ok(())
}

/// One exported CSV row.
#[derive(Serialize)]
struct GradeRow<'a> {
    semester: u8,
    department: &'a str,
    subject: &'a str,
    credit_hours: f64,
    raw_score: f64,
    subject_mean: Option<f64>,
    subject_std_dev: Option<f64>,
    achievement: Option<&'a str>,
    enrollment: Option<u32>,
    rank_grade: Option<u8>,
}

impl<'a> From<&'a CourseGrade> for GradeRow<'a> {
    fn from(c: &'a CourseGrade) -> Self {
        Self {
            semester: c.semester.number(),
            department: &c.department,
            subject: &c.subject,
            credit_hours: c.credit_hours,
            raw_score: c.raw_score,
            subject_mean: c.subject_mean,
            subject_std_dev: c.subject_std_dev,
            achievement: c.achievement.as_deref(),
            enrollment: c.enrollment,
            rank_grade: c.rank_grade,
        }
    }
}

/// Writes every course of `record` to a CSV file at `path`, replacing any
/// existing file.
pub fn write_grades_csv(path: impl AsRef<Path>, record: &StudentRecord) -> Result<usize> {
    let path = path.as_ref();
    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;

    let mut written = 0;
    for course in record.grades_by_semester.values().flatten() {
        writer.serialize(GradeRow::from(course))?;
        written += 1;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = written, "Grades CSV written");
    Ok(written)
}

/// Renders a Markdown report of the record and its insights. Averages are
/// rounded to two decimals for display only.
pub fn render_report(record: &StudentRecord, insights: &Insights) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# 학생 생활기록부 분석 보고서");
    let _ = writeln!(out);
    let _ = writeln!(out, "## 성적 요약");
    let _ = writeln!(out);
    let _ = writeln!(out, "| 구분 | 전체 평균 | 전체 가중평균 | 주요과목 평균 | 주요과목 가중평균 |");
    let _ = writeln!(out, "|---|---|---|---|---|");
    for period in [Period::First, Period::Second, Period::Total] {
        let avg = record.averages(period);
        let _ = writeln!(
            out,
            "| {} | {:.2} | {:.2} | {:.2} | {:.2} |",
            period,
            avg.simple_average,
            avg.weighted_average,
            avg.main_simple_average,
            avg.main_weighted_average
        );
    }

    if let Some(trend) = insights.trend {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "- 성적 변화: {:+.2} ({})",
            trend.overall,
            if trend.improved() { "향상" } else { "보완 필요" }
        );
        let _ = writeln!(
            out,
            "- 주요과목 변화: {:+.2} ({})",
            trend.main_subjects,
            if trend.main_improved() { "향상" } else { "보완 필요" }
        );
    }

    for (semester, courses) in &record.grades_by_semester {
        let _ = writeln!(out);
        let _ = writeln!(out, "### {}", semester);
        for course in courses {
            match course.rank_grade {
                Some(grade) => {
                    let _ = writeln!(
                        out,
                        "- {}: {}등급 (원점수 {:.1}, {}학점)",
                        course.subject, grade, course.raw_score, course.credit_hours
                    );
                }
                None => {
                    let _ = writeln!(out, "- {}: 등급 없음", course.subject);
                }
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## 세부능력 및 특기사항");
    if insights.notable_remarks.is_empty() {
        let _ = writeln!(out, "기록된 내용이 없습니다.");
    } else {
        for (subject, remark) in &insights.notable_remarks {
            let _ = writeln!(out, "- [{}] {}", subject, remark);
        }
    }
    if !insights.strength_subjects.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "강점 과목: {}", insights.strength_subjects.join(", "));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## 창의적 체험활동");
    if insights.notable_activities.is_empty() {
        let _ = writeln!(out, "활동 내역이 충분하지 않습니다.");
    } else {
        for (category, activity) in &insights.notable_activities {
            let _ = writeln!(out, "- [{}] {}", category, activity);
        }
    }
    if insights.broad_participation {
        let _ = writeln!(out);
        let _ = writeln!(out, "다양한 비교과 활동에 참여하고 있습니다.");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## 진로 희망");
    let _ = writeln!(out, "{}", record.career_aspiration);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::insights::derive_insights;
    use crate::config::GradePolicy;
    use crate::extractor::extract;
    use crate::parser::Grid;

    fn sample_record() -> StudentRecord {
        let grid = Grid::from_rows(vec![
            vec!["국어", "수학", "자율", "진로희망"],
            vec!["비평문 작성 능력이 우수함", "성실함", "학급 자치 활동에 적극 참여", "데이터 과학자"],
            vec!["학기", "교과", "과목", "학점수", "원점수/과목평균", "성취도", "석차등급"],
            vec!["1", "국어", "국어", "4", "95/70(12)", "A(200)", "1"],
            vec!["2", "국어", "문학", "4", "88/71(11)", "A(200)", "2"],
            vec!["2", "체육", "체육", "2", "", "A", ""],
        ]);
        extract(&grid, &GradePolicy::default()).unwrap()
    }

    #[test]
    fn test_write_pretty() {
        let mut buf = Vec::new();
        write_pretty(&mut buf, &StudentRecord::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("StudentRecord {"));
        assert!(text.contains("미정"));
    }

    #[test]
    fn test_write_json_parses_back() {
        let record = sample_record();
        let mut buf = Vec::new();
        write_json(&mut buf, &record).unwrap();
        assert!(buf.ends_with(b"}\n"));

        let parsed: StudentRecord = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_render_report_sections() {
        let record = sample_record();
        let report = render_report(&record, &derive_insights(&record));

        assert!(report.starts_with("# 학생 생활기록부 분석 보고서"));
        assert!(report.contains("| 1학기 | 1.00 | 1.00 | 1.00 | 1.00 |"));
        assert!(report.contains("| 전체 | 1.50 |"));
        assert!(report.contains("- 성적 변화: -1.00 (보완 필요)"));
        assert!(report.contains("- 체육: 등급 없음"));
        assert!(report.contains("- [국어] 비평문 작성 능력이 우수함"));
        assert!(!report.contains("성실함"));
        assert!(report.contains("- [자율] 학급 자치 활동에 적극 참여"));
        assert!(report.contains("강점 과목: 국어"));
        assert!(report.contains("데이터 과학자"));
    }

    #[test]
    fn test_write_grades_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grades.csv");

        let written = write_grades_csv(&path, &sample_record()).unwrap();
        assert_eq!(written, 3);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("semester,department,subject"));
        assert!(lines[1].contains("95"));
    }
}
