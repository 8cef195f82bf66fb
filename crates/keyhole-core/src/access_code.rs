use crate::error::CoreError;

/// A validated access code (the password a visitor submits).
///
/// Access codes are opaque identifiers used directly as record keys, so the
/// value is kept exactly as submitted: it is neither trimmed nor normalized.
/// The only requirement is at least one non-whitespace character; any other
/// string is a well-formed code that simply may not be registered.
///
/// The value is never rendered by `Debug` so it cannot leak into logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessCode(String);

impl AccessCode {
    /// Creates a new `AccessCode` after validating the input.
    pub fn new(code: impl Into<String>) -> Result<Self, CoreError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Creates an `AccessCode` without validation.
    ///
    /// Use this only for codes read back from a trusted store.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the access code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> Result<(), CoreError> {
        if code.trim().is_empty() {
            return Err(CoreError::InvalidAccessCode(
                "access code is required".to_string(),
            ));
        }

        Ok(())
    }
}

impl std::fmt::Debug for AccessCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessCode(<redacted>)")
    }
}
