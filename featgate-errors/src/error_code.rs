use std::fmt;

macro_rules! error_codes {
    ($(
        $(#[$meta:meta])*
        $variant:ident = $code:literal, $name:literal, $message:expr;
    )*) => {
        /// Error kinds that can travel in a feature-update exchange.
        ///
        /// Every variant has a stable signed 16-bit wire value. Values not
        /// listed here are mapped to [`ErrorCode::UnknownServerError`] by
        /// [`ErrorCode::from_code`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
        #[repr(i16)]
        pub enum ErrorCode {
            $(
                $(#[$meta])*
                $variant = $code,
            )*
        }

        impl ErrorCode {
            /// Every registered code, ordered by wire value.
            pub const ALL: &'static [ErrorCode] = &[$(ErrorCode::$variant),*];

            /// Strict lookup of a wire value.
            pub fn try_from_code(code: i16) -> Option<ErrorCode> {
                match code {
                    $($code => Some(ErrorCode::$variant),)*
                    _ => None,
                }
            }

            /// Symbolic name, as used in logs and metrics labels.
            pub fn name(&self) -> &'static str {
                match self {
                    $(ErrorCode::$variant => $name,)*
                }
            }

            /// Message used when an [`ApiError`](crate::ApiError) is built
            /// without an explicit one.
            pub fn default_message(&self) -> Option<&'static str> {
                match self {
                    $(ErrorCode::$variant => $message,)*
                }
            }
        }
    };
}

error_codes! {
    UnknownServerError = -1, "UNKNOWN_SERVER_ERROR",
        Some("The server experienced an unexpected error when processing the request.");
    None = 0, "NONE", None;
    CorruptMessage = 2, "CORRUPT_MESSAGE",
        Some("This message has failed its CRC checksum, exceeds the valid size, has a null key for a compacted topic, or is otherwise corrupt.");
    RequestTimedOut = 7, "REQUEST_TIMED_OUT", Some("The request timed out.");
    CoordinatorNotAvailable = 15, "COORDINATOR_NOT_AVAILABLE",
        Some("The coordinator is not available.");
    ClusterAuthorizationFailed = 31, "CLUSTER_AUTHORIZATION_FAILED",
        Some("Cluster authorization failed.");
    UnsupportedVersion = 35, "UNSUPPORTED_VERSION",
        Some("The version of API is not supported.");
    NotController = 41, "NOT_CONTROLLER",
        Some("This is not the correct controller for this cluster.");
    InvalidRequest = 42, "INVALID_REQUEST",
        Some("This most likely occurs because of a request being malformed by the client library or the message was sent to an incompatible broker. See the broker logs for more details.");
    PolicyViolation = 44, "POLICY_VIOLATION",
        Some("Request parameters do not satisfy the configured policy.");
    ThrottlingQuotaExceeded = 89, "THROTTLING_QUOTA_EXCEEDED",
        Some("The throttling quota has been exceeded.");
    InvalidUpdateVersion = 95, "INVALID_UPDATE_VERSION",
        Some("The given update version was invalid.");
    FeatureUpdateFailed = 96, "FEATURE_UPDATE_FAILED",
        Some("Unable to update finalized features due to an unexpected server error.");
}

impl ErrorCode {
    /// Wire value of the code.
    pub fn code(&self) -> i16 {
        *self as i16
    }

    /// Total lookup of a wire value.
    ///
    /// Codes this registry does not know (e.g. sent by a newer peer) become
    /// [`ErrorCode::UnknownServerError`] instead of failing.
    pub fn from_code(code: i16) -> ErrorCode {
        match ErrorCode::try_from_code(code) {
            Some(kind) => kind,
            None => {
                tracing::warn!(code, "unexpected error code, treating as UNKNOWN_SERVER_ERROR");
                ErrorCode::UnknownServerError
            }
        }
    }

    pub fn is_none(&self) -> bool {
        *self == ErrorCode::None
    }
}

impl Default for ErrorCode {
    fn default() -> Self {
        ErrorCode::None
    }
}

impl From<ErrorCode> for i16 {
    fn from(code: ErrorCode) -> i16 {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
