//! Outcome-tagged service results

/// Outcome classification the HTTP layer turns into a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultType {
    Success,
    Created,
    NotFound,
    Conflict,
    BadRequest,
}

/// User-facing error messages
pub mod messages {
    pub const INVALID_EMAIL: &str = "Invalid email";
    pub const EMAIL_EXISTS: &str = "Email already exists";
    pub const USER_NOT_FOUND: &str = "User not found";
    pub const INVALID_DATA: &str = "Invalid data";
}

/// Result of a single service call.
///
/// `payload` is set for `Success` and `Created`, `error` for everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResult<T> {
    pub status_code: ResultType,
    pub error: Option<String>,
    pub payload: Option<T>,
}

impl<T> ServiceResult<T> {
    pub fn success(payload: T) -> Self {
        Self::with_payload(ResultType::Success, payload)
    }

    pub fn created(payload: T) -> Self {
        Self::with_payload(ResultType::Created, payload)
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::failure(ResultType::NotFound, error)
    }

    pub fn conflict(error: impl Into<String>) -> Self {
        Self::failure(ResultType::Conflict, error)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.status_code, ResultType::Success | ResultType::Created)
    }

    fn with_payload(status_code: ResultType, payload: T) -> Self {
        Self {
            status_code,
            error: None,
            payload: Some(payload),
        }
    }

    fn failure(status_code: ResultType, error: impl Into<String>) -> Self {
        Self {
            status_code,
            error: Some(error.into()),
            payload: None,
        }
    }
}
