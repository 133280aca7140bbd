use std::fmt;

use crate::ErrorCode;

/// An error code with an optional human readable message.
///
/// Equality compares both the code and the message. A message is never
/// stored for [`ErrorCode::None`], so every successful value equals
/// [`ApiError::NONE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
pub struct ApiError {
    code: ErrorCode,
    message: Option<String>,
}

impl ApiError {
    pub const NONE: ApiError = ApiError {
        code: ErrorCode::None,
        message: None,
    };

    /// Builds an error carrying the code's default message.
    pub fn new(code: ErrorCode) -> ApiError {
        ApiError::with_message(code, code.default_message().map(String::from))
    }

    pub fn with_message(code: ErrorCode, message: Option<String>) -> ApiError {
        if code.is_none() {
            return ApiError::NONE;
        }
        ApiError { code, message }
    }

    /// Builds an error from values read off the wire.
    pub fn from_wire(code: i16, message: Option<String>) -> ApiError {
        ApiError::with_message(ErrorCode::from_code(code), message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The explicit message if one was set, otherwise the code's default.
    pub fn message_with_fallback(&self) -> Option<&str> {
        self.message().or_else(|| self.code.default_message())
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code
    }

    pub fn is_none(&self) -> bool {
        self.code.is_none()
    }

    pub fn is_success(&self) -> bool {
        self.is_none()
    }

    pub fn is_failure(&self) -> bool {
        !self.is_none()
    }
}

impl Default for ApiError {
    fn default() -> Self {
        ApiError::NONE
    }
}

impl From<ErrorCode> for ApiError {
    fn from(code: ErrorCode) -> ApiError {
        ApiError::new(code)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.code, message),
            None => write!(f, "{}", self.code),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use crate::ErrorCode;

    #[test]
    fn none_is_value_equal() {
        assert_eq!(ApiError::new(ErrorCode::None), ApiError::NONE);
        assert_eq!(
            ApiError::with_message(ErrorCode::None, Some("ignored".into())),
            ApiError::NONE
        );
        assert!(ApiError::NONE.is_none());
        assert!(ApiError::NONE.is_success());
        assert_eq!(ApiError::default(), ApiError::NONE);
    }

    #[test]
    fn equality_includes_message() {
        let a = ApiError::new(ErrorCode::InvalidRequest);
        let b = ApiError::with_message(ErrorCode::InvalidRequest, Some("other".into()));
        let c = ApiError::with_message(ErrorCode::InvalidRequest, None);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, ApiError::new(ErrorCode::InvalidRequest));
        assert!(a.is_failure());
        assert!(a.is(ErrorCode::InvalidRequest));
    }

    #[test]
    fn fallback_message() {
        let err = ApiError::with_message(ErrorCode::FeatureUpdateFailed, None);
        assert_eq!(err.message(), None);
        assert_eq!(
            err.message_with_fallback(),
            ErrorCode::FeatureUpdateFailed.default_message()
        );
        assert_eq!(ApiError::NONE.message_with_fallback(), None);
    }

    #[test]
    fn from_wire_maps_unknown_codes() {
        let err = ApiError::from_wire(9999, Some("from the future".into()));
        assert_eq!(err.code(), ErrorCode::UnknownServerError);
        assert_eq!(err.message(), Some("from the future"));
    }

    #[test]
    fn display() {
        let err = ApiError::with_message(ErrorCode::NotController, Some("moved".into()));
        assert_eq!(err.to_string(), "NOT_CONTROLLER: moved");
        assert_eq!(ApiError::NONE.to_string(), "NONE");
    }
}
