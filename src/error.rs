//! Errors raised by the extraction core.

/// The upload cannot be split into even a minimal remarks/grades layout.
///
/// Routine data-quality gaps (missing semester, ungraded course, unparseable
/// numbers) never produce this error; they are skipped or defaulted instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedInputError {
    #[error("input contains no rows")]
    Empty,

    #[error("input contains only empty cells")]
    Blank,

    #[error("failed to read CSV: {0}")]
    Csv(String),
}

impl MalformedInputError {
    /// Message shown to the person who uploaded the file.
    pub fn user_message(&self) -> &'static str {
        match self {
            MalformedInputError::Empty | MalformedInputError::Blank => {
                "파일에 데이터가 없습니다. 파일 형식을 확인해주세요."
            }
            MalformedInputError::Csv(_) => "파일 처리에 실패했습니다. 파일 형식을 확인해주세요.",
        }
    }
}

impl From<csv::Error> for MalformedInputError {
    fn from(err: csv::Error) -> Self {
        MalformedInputError::Csv(err.to_string())
    }
}
