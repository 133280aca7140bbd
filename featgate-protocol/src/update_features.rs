/*!
The [UpdateFeaturesResponse] returned by the node coordinating a
cluster-wide feature flag update.

```rust,ignore
pub struct UpdateFeaturesResponse {
    throttle_time_ms: u32,
    top_level_error: ApiError,
    results: Vec<FeatureResult>,
}
```

Whether `results` is written depends on the negotiated version, see
[`ResponseLayout`](crate::version::ResponseLayout).
*/

use std::collections::{BTreeSet, HashMap};

use bytes::{BufMut, Bytes, BytesMut};
use snafu::{ensure, OptionExt};

use featgate_errors::{ApiError, ErrorCode};

use crate::aggregate;
use crate::encoding::{decode_compact_array_len, decode_compact_nullable_str, decode_compact_str};
use crate::encoding::{decode_i16, decode_i32, decode_tagged_fields};
use crate::encoding::{encode_compact_array_len, encode_compact_nullable_str, encode_compact_str};
use crate::encoding::{encode_tagged_fields, Decode, Encode, Input, Output};
use crate::errors::{self, DecodeError, EncodeError};
use crate::version::ApiVersion;

/// Outcome of the update of one named feature.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[display("{feature}: {error_code}")]
pub struct FeatureResult {
    feature: String,
    error_code: ErrorCode,
    error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
pub struct UpdateFeaturesResponse {
    throttle_time_ms: u32,
    top_level_error: ApiError,
    results: Vec<FeatureResult>,
}

impl FeatureResult {
    /// Smallest encoding of an entry: empty name, code, null message and
    /// an empty tagged field section.
    const MIN_WIRE_SIZE: usize = 1 + 2 + 1 + 1;

    pub fn new(feature: impl Into<String>, error: ApiError) -> FeatureResult {
        FeatureResult {
            feature: feature.into(),
            error_code: error.code(),
            error_message: error.message().map(String::from),
        }
    }
    pub fn feature(&self) -> &str {
        &self.feature
    }
    pub fn error_code(&self) -> ErrorCode {
        self.error_code
    }
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
    pub fn api_error(&self) -> ApiError {
        ApiError::with_message(self.error_code, self.error_message.clone())
    }
}

impl UpdateFeaturesResponse {
    pub fn new(
        throttle_time_ms: u32,
        top_level_error: ApiError,
        results: Vec<FeatureResult>,
    ) -> UpdateFeaturesResponse {
        UpdateFeaturesResponse {
            throttle_time_ms,
            top_level_error,
            results,
        }
    }

    /// Builds a response for an update of `features` that ended with
    /// `top_level_error`.
    ///
    /// A successful update reports every feature as NONE. A failed one
    /// carries no per-feature results, only the top-level error. Names are
    /// deduplicated and ordered lexicographically, so the encoded form does
    /// not depend on the caller's iteration order.
    pub fn create_with_errors<I, S>(
        top_level_error: ApiError,
        features: I,
        throttle_time_ms: u32,
    ) -> UpdateFeaturesResponse
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let results = if top_level_error.is_none() {
            let features: BTreeSet<String> = features.into_iter().map(Into::into).collect();
            features
                .into_iter()
                .map(|feature| FeatureResult::new(feature, ApiError::NONE))
                .collect()
        } else {
            Vec::new()
        };
        UpdateFeaturesResponse::new(throttle_time_ms, top_level_error, results)
    }

    /// Concatenates the results of `parts`, in order, under a new top-level
    /// error. The throttle time is the largest one among the parts.
    pub fn combine(
        top_level_error: ApiError,
        parts: impl IntoIterator<Item = UpdateFeaturesResponse>,
    ) -> UpdateFeaturesResponse {
        let mut throttle_time_ms = 0;
        let mut results = Vec::new();
        for part in parts {
            throttle_time_ms = throttle_time_ms.max(part.throttle_time_ms);
            results.extend(part.results);
        }
        UpdateFeaturesResponse::new(throttle_time_ms, top_level_error, results)
    }

    pub fn with_throttle_time_ms(self, throttle_time_ms: u32) -> UpdateFeaturesResponse {
        UpdateFeaturesResponse {
            throttle_time_ms,
            ..self
        }
    }

    pub fn throttle_time_ms(&self) -> u32 {
        self.throttle_time_ms
    }
    pub fn top_level_error(&self) -> &ApiError {
        &self.top_level_error
    }
    pub fn results(&self) -> &[FeatureResult] {
        &self.results
    }

    /// Number of occurrences of each error code, top-level error included.
    pub fn error_counts(&self) -> HashMap<ErrorCode, usize> {
        aggregate::error_counts(self)
    }

    pub fn serialize(&self, version: ApiVersion) -> Result<Bytes, EncodeError> {
        let mut bytes = BytesMut::new();
        self.encode(&mut Output::new(&version, &mut bytes))?;
        Ok(bytes.freeze())
    }

    /// Decodes a complete response body. Bytes left after the body are an
    /// error.
    pub fn parse(bytes: Bytes, version: ApiVersion) -> Result<UpdateFeaturesResponse, DecodeError> {
        let buf = &mut Input::new(version, bytes);
        let result = UpdateFeaturesResponse::decode(buf).and_then(|response| {
            ensure!(
                buf.is_empty(),
                errors::ExtraData {
                    remaining: buf.len()
                }
            );
            Ok(response)
        });
        if let Err(e) = &result {
            tracing::debug!(%version, "malformed UpdateFeatures response: {e}");
        }
        result
    }
}

impl Encode for FeatureResult {
    fn encode(&self, buf: &mut Output) -> Result<(), EncodeError> {
        encode_compact_str(buf, &self.feature)?;
        buf.reserve(2);
        buf.put_i16(self.error_code.code());
        encode_compact_nullable_str(buf, self.error_message.as_deref())?;
        encode_tagged_fields(buf);
        Ok(())
    }
}

impl Decode for FeatureResult {
    fn decode(buf: &mut Input) -> Result<Self, DecodeError> {
        let feature = decode_compact_str(buf, "feature")?;
        let code = decode_i16(buf)?;
        let message = decode_compact_nullable_str(buf)?;
        decode_tagged_fields(buf)?;
        let error = ApiError::from_wire(code, message);
        Ok(FeatureResult {
            feature,
            error_code: error.code(),
            error_message: error.message().map(String::from),
        })
    }
}

impl Encode for UpdateFeaturesResponse {
    fn encode(&self, buf: &mut Output) -> Result<(), EncodeError> {
        let throttle_time_ms = i32::try_from(self.throttle_time_ms)
            .ok()
            .context(errors::ThrottleTimeTooLarge {
                value: self.throttle_time_ms,
            })?;
        buf.reserve(4 + 2);
        buf.put_i32(throttle_time_ms);
        buf.put_i16(self.top_level_error.code().code());
        encode_compact_nullable_str(buf, self.top_level_error.message())?;

        let layout = buf.version().layout();
        if layout.writes_results(self.top_level_error.is_none()) {
            encode_compact_array_len(buf, self.results.len())?;
            for result in &self.results {
                result.encode(buf)?;
            }
        } else {
            if !self.results.is_empty() {
                tracing::trace!(
                    version = %buf.version(),
                    omitted = self.results.len(),
                    "not writing feature results of a successful response"
                );
            }
            encode_compact_array_len(buf, 0)?;
        }
        encode_tagged_fields(buf);
        Ok(())
    }
}

impl Decode for UpdateFeaturesResponse {
    fn decode(buf: &mut Input) -> Result<Self, DecodeError> {
        let throttle_time_ms = decode_i32(buf)?;
        ensure!(
            throttle_time_ms >= 0,
            errors::NegativeThrottleTime {
                value: throttle_time_ms
            }
        );
        let code = decode_i16(buf)?;
        let message = decode_compact_nullable_str(buf)?;
        let len = decode_compact_array_len(buf, FeatureResult::MIN_WIRE_SIZE)?.unwrap_or(0);
        let mut results = Vec::with_capacity(len);
        for _ in 0..len {
            results.push(FeatureResult::decode(buf)?);
        }
        decode_tagged_fields(buf)?;
        Ok(UpdateFeaturesResponse {
            throttle_time_ms: throttle_time_ms as u32,
            top_level_error: ApiError::from_wire(code, message),
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn failed(feature: &str, code: ErrorCode) -> FeatureResult {
        FeatureResult::new(feature, ApiError::new(code))
    }

    #[test]
    fn create_with_errors_sorts_and_dedups() {
        let response =
            UpdateFeaturesResponse::create_with_errors(ApiError::NONE, ["b", "a", "c", "a"], 5);
        let names: Vec<_> = response.results().iter().map(|r| r.feature()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        for result in response.results() {
            assert_eq!(result.api_error(), ApiError::NONE);
            assert_eq!(result.error_message(), None);
        }
        assert_eq!(response.throttle_time_ms(), 5);
    }

    #[test]
    fn create_with_errors_failure_has_no_results() {
        let error = ApiError::new(ErrorCode::NotController);
        let response = UpdateFeaturesResponse::create_with_errors(error.clone(), ["a", "b"], 0);
        assert_eq!(response.top_level_error(), &error);
        assert!(response.results().is_empty());
    }

    #[test]
    fn empty_feature_names_are_accepted() {
        let response = UpdateFeaturesResponse::create_with_errors(ApiError::NONE, [""], 0);
        assert_eq!(response.results(), &[FeatureResult::new("", ApiError::NONE)]);
        let bytes = response.serialize(ApiVersion(0)).unwrap();
        let decoded = UpdateFeaturesResponse::parse(bytes, ApiVersion(0)).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn combine_keeps_order() {
        let response = UpdateFeaturesResponse::combine(
            ApiError::new(ErrorCode::InvalidRequest),
            [
                UpdateFeaturesResponse::new(
                    10,
                    ApiError::new(ErrorCode::UnknownServerError),
                    vec![
                        failed("foo", ErrorCode::UnknownServerError),
                        failed("bar", ErrorCode::UnknownServerError),
                    ],
                ),
                UpdateFeaturesResponse::new(
                    30,
                    ApiError::new(ErrorCode::FeatureUpdateFailed),
                    vec![failed("baz", ErrorCode::FeatureUpdateFailed)],
                ),
            ],
        );
        assert_eq!(
            response.results(),
            &[
                failed("foo", ErrorCode::UnknownServerError),
                failed("bar", ErrorCode::UnknownServerError),
                failed("baz", ErrorCode::FeatureUpdateFailed),
            ]
        );
        assert_eq!(response.throttle_time_ms(), 30);
        assert!(response.top_level_error().is(ErrorCode::InvalidRequest));
    }

    #[test]
    fn with_throttle_time_copies() {
        let response = UpdateFeaturesResponse::create_with_errors(ApiError::NONE, ["x"], 1);
        let throttled = response.clone().with_throttle_time_ms(100);
        assert_eq!(throttled.throttle_time_ms(), 100);
        assert_eq!(throttled.results(), response.results());
        assert_eq!(response.throttle_time_ms(), 1);
    }

    #[test]
    fn feature_result_display() {
        assert_eq!(
            failed("metadata.version", ErrorCode::InvalidUpdateVersion).to_string(),
            "metadata.version: INVALID_UPDATE_VERSION"
        );
    }

    #[test]
    fn results_omitted_only_for_new_versions_on_success() {
        let response =
            UpdateFeaturesResponse::create_with_errors(ApiError::NONE, ["f1", "f2"], 0);
        for version in 0..=1 {
            let bytes = response.serialize(ApiVersion(version)).unwrap();
            let decoded = UpdateFeaturesResponse::parse(bytes, ApiVersion(version)).unwrap();
            assert_eq!(decoded, response);
        }
        let bytes = response.serialize(ApiVersion(2)).unwrap();
        let decoded = UpdateFeaturesResponse::parse(bytes, ApiVersion(2)).unwrap();
        assert!(decoded.results().is_empty());
        assert_eq!(decoded.top_level_error(), &ApiError::NONE);
    }

    #[test]
    fn throttle_time_must_fit_int32() {
        let response = UpdateFeaturesResponse::new(u32::MAX, ApiError::NONE, vec![]);
        assert!(matches!(
            response.serialize(ApiVersion(0)),
            Err(EncodeError::ThrottleTimeTooLarge { value: u32::MAX, .. })
        ));
    }
}
