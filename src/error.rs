//! Stable error codes shared by the crate's error enums.
//!
//! Hosts surface AI failures to users and decide whether to offer a retry.
//! Each error type maps its variants to a fixed `E_*` code so that decision
//! does not depend on message text.

/// Trait for errors that carry a stable machine-readable code.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    /// Whether the same request may succeed if sent again.
    fn retryable(&self) -> bool {
        false
    }
}
