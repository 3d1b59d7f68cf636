use std::collections::BTreeMap;

use crate::analyzers::types::{Insights, Trend};
use crate::record::{Period, Semester, StudentRecord};

/// Words in a subject remark that mark the subject as a strength.
static PRAISE_WORDS: &[&str] = &["우수", "탁월", "뛰어난"];

/// Remarks at or below this many characters are treated as filler.
const NOTABLE_MIN_CHARS: usize = 10;

/// Activity categories needed before participation counts as broad.
const BROAD_PARTICIPATION_MIN: usize = 3;

/// Derives [`Insights`] from an extracted record.
pub fn derive_insights(record: &StudentRecord) -> Insights {
    let strength_subjects = record
        .subject_remarks
        .iter()
        .filter(|(_, remark)| PRAISE_WORDS.iter().any(|w| remark.contains(w)))
        .map(|(subject, _)| subject.clone())
        .collect();

    let participated = record
        .activity_remarks
        .values()
        .filter(|text| !text.trim().is_empty())
        .count();

    Insights {
        trend: trend(record),
        strength_subjects,
        notable_remarks: notable(&record.subject_remarks),
        notable_activities: notable(&record.activity_remarks),
        broad_participation: participated >= BROAD_PARTICIPATION_MIN,
    }
}

fn notable(entries: &BTreeMap<String, String>) -> Vec<(String, String)> {
    entries
        .iter()
        .filter(|(_, text)| text.chars().count() > NOTABLE_MIN_CHARS)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn trend(record: &StudentRecord) -> Option<Trend> {
    let graded = |semester| record.courses(semester).iter().any(|c| c.is_graded());
    if !graded(Semester::First) || !graded(Semester::Second) {
        return None;
    }

    let first = record.averages(Period::First);
    let second = record.averages(Period::Second);
    Some(Trend {
        overall: first.weighted_average - second.weighted_average,
        main_subjects: first.main_weighted_average - second.main_weighted_average,
    })
}
