//! Error counting for metrics sinks.

use std::collections::HashMap;

use featgate_errors::ErrorCode;

use crate::update_features::UpdateFeaturesResponse;

/// Counts the top-level error and every per-feature error of `response`.
///
/// Only codes that occur are present, and the counts always add up to
/// `1 + response.results().len()`.
pub fn error_counts(response: &UpdateFeaturesResponse) -> HashMap<ErrorCode, usize> {
    let mut counts = HashMap::new();
    update_error_counts(&mut counts, response.top_level_error().code());
    for result in response.results() {
        update_error_counts(&mut counts, result.error_code());
    }
    counts
}

pub fn update_error_counts(counts: &mut HashMap<ErrorCode, usize>, code: ErrorCode) {
    *counts.entry(code).or_insert(0) += 1;
}
