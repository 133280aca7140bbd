/*!
Version negotiation data for the UpdateFeatures exchange.

Layout differences between versions are kept in [`LAYOUTS`] rather than in
branches of the codec, so a new version is added by appending a row.
*/

/// Api key of the UpdateFeatures request/response pair.
pub const API_KEY: i16 = 57;
pub const LOWEST_SUPPORTED_VERSION: ApiVersion = ApiVersion(0);
pub const HIGHEST_SUPPORTED_VERSION: ApiVersion = ApiVersion(2);

/// Version agreed with the peer during the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("v{_0}")]
pub struct ApiVersion(pub u16);

impl ApiVersion {
    pub fn current() -> ApiVersion {
        HIGHEST_SUPPORTED_VERSION
    }
    pub fn is_supported(&self) -> bool {
        (LOWEST_SUPPORTED_VERSION..=HIGHEST_SUPPORTED_VERSION).contains(self)
    }
    /// Layout rules that apply to responses at this version.
    pub fn layout(&self) -> &'static ResponseLayout {
        layout(*self)
    }
}

impl From<u16> for ApiVersion {
    fn from(version: u16) -> ApiVersion {
        ApiVersion(version)
    }
}

/// Presence rules for the response body at one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseLayout {
    /// First version these rules apply to.
    pub version: ApiVersion,
    /// Per-feature results are left out when the top-level error is NONE.
    pub omits_results_on_success: bool,
}

impl ResponseLayout {
    /// Whether results are written for a response with the given top-level
    /// outcome.
    pub fn writes_results(&self, top_level_success: bool) -> bool {
        !(self.omits_results_on_success && top_level_success)
    }
}

pub static LAYOUTS: &[ResponseLayout] = &[
    ResponseLayout {
        version: ApiVersion(0),
        omits_results_on_success: false,
    },
    ResponseLayout {
        version: ApiVersion(1),
        omits_results_on_success: false,
    },
    // Feature level results are only reported on failure.
    ResponseLayout {
        version: ApiVersion(2),
        omits_results_on_success: true,
    },
];

/// Layout for `version`. Versions newer than the table use its last row.
pub fn layout(version: ApiVersion) -> &'static ResponseLayout {
    let newest = &LAYOUTS[LAYOUTS.len() - 1];
    if version > newest.version {
        tracing::trace!(%version, newest = %newest.version, "version beyond layout table");
        return newest;
    }
    LAYOUTS
        .iter()
        .rev()
        .find(|row| row.version <= version)
        .unwrap_or(newest)
}
