//! Result type alias for the engine

use super::errors::EngineError;

/// Result type alias for engine operations
///
/// # Examples
///
/// ```
/// use tenant_backup::domain::result::Result;
/// use tenant_backup::domain::errors::EngineError;
///
/// fn failing_function() -> Result<()> {
///     Err(EngineError::validation("date", "not a date"))
/// }
/// ```
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
