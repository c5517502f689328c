//! Result helpers for shared error handling.

use crate::errors::ErrorEnvelope;

/// Shared result type used across the workspace.
pub type Result<T, E = ErrorEnvelope> = std::result::Result<T, E>;

/// Extension helpers for attaching diagnostics to failed results.
pub trait ResultExt<T> {
    /// Attach a metadata entry to the error, preserving the success.
    fn with_error_metadata(self, key: &str, value: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_error_metadata(self, key: &str, value: impl Into<String>) -> Result<T> {
        self.map_err(|error| error.with_metadata(key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn with_error_metadata_tags_errors() {
        let value: Result<i32> = Err(ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "bad input",
        ));
        let tagged = value.with_error_metadata("source", "rules");

        let error = tagged.err();
        assert_eq!(
            error
                .as_ref()
                .and_then(|error| error.metadata.get("source"))
                .map(String::as_str),
            Some("rules")
        );
    }

    #[test]
    fn with_error_metadata_keeps_success() {
        let value: Result<i32> = Ok(2);
        assert!(matches!(value.with_error_metadata("source", "rules"), Ok(2)));
    }
}
