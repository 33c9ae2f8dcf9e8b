use thiserror::Error;

/// Errors surfaced by the extraction core.
#[derive(Debug, Error)]
pub enum TermError {
    /// Request envelope is missing records or the description column.
    #[error("invalid request shape: {0}")]
    InputShape(String),
    /// Every description cleaned down to nothing.
    #[error("fault descriptions are empty after cleaning")]
    EmptyContent,
    /// A vocabulary document could not be parsed.
    #[error("invalid vocabulary: {0}")]
    Vocabulary(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TermError>;

#[cfg(test)]
mod tests {
    use super::TermError;

    #[test]
    fn display_messages_are_human_readable() {
        assert_eq!(
            TermError::InputShape("missing 'records'".to_string()).to_string(),
            "invalid request shape: missing 'records'"
        );
        assert_eq!(
            TermError::EmptyContent.to_string(),
            "fault descriptions are empty after cleaning"
        );
        assert_eq!(
            TermError::Vocabulary("bad list".to_string()).to_string(),
            "invalid vocabulary: bad list"
        );
    }

    #[test]
    fn json_error_converts() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: TermError = err.into();
        assert!(matches!(err, TermError::Json(_)));
    }
}
