//! Error types for the translation core.
//!
//! The pipeline functions themselves are total; these errors only
//! surface as diagnostics for malformed wire payloads, which the
//! dispatch layer logs before falling back to defaults.

/// Core-level error.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Payload was not parseable under the expected wire convention.
    #[error("Malformed payload on {channel}: {source}")]
    MalformedPayload {
        /// Which wire convention was expected.
        channel: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}
