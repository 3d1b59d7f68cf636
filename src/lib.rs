//! Student record (생활기록부) extraction and grade averaging.
//!
//! [`extractor::extract_csv`] turns a school-record CSV export into a
//! [`record::StudentRecord`] with per-semester rank-grade averages.

pub mod analyzers;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod record;
pub mod schema;

pub use config::{GradePolicy, TotalRule};
pub use error::MalformedInputError;
pub use extractor::{extract, extract_csv};
pub use record::{CourseGrade, Period, Semester, SemesterAverages, StudentRecord};
