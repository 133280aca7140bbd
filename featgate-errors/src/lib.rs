/*!
Error codes exchanged by nodes negotiating cluster-wide feature flags.

[`ErrorCode`] is the closed registry of wire codes and [`ApiError`] pairs a
code with an optional message. Both are plain values: operational errors are
carried inside responses as data, they never abort decoding.
*/

mod api_error;
mod error_code;

pub use api_error::ApiError;
pub use error_code::ErrorCode;
