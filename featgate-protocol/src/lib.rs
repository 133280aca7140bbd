/*!
Wire protocol for the response of a cluster-wide feature update.

The coordinating node answers an UpdateFeatures request with either a single
top-level error or a list of per-feature results. This crate holds that
response ([`UpdateFeaturesResponse`]), its version-aware encoding and the
error counting used by metrics.

```rust
use featgate_errors::{ApiError, ErrorCode};
use featgate_protocol::{ApiVersion, UpdateFeaturesResponse};

let response = UpdateFeaturesResponse::create_with_errors(
    ApiError::new(ErrorCode::InvalidUpdateVersion),
    ["metadata.version"],
    0,
);
let bytes = response.serialize(ApiVersion(2))?;
let decoded = UpdateFeaturesResponse::parse(bytes, ApiVersion(2))?;
assert_eq!(decoded, response);
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

pub mod aggregate;
pub mod encoding;
pub mod errors;
pub mod update_features;
pub mod version;

pub use featgate_errors::{ApiError, ErrorCode};
pub use update_features::{FeatureResult, UpdateFeaturesResponse};
pub use version::ApiVersion;
