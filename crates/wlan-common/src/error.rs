//! Error types for OpenWLAN
//!
//! Selection and recovery never fail; these errors only surface at the
//! boundaries where text is parsed or configuration is loaded.

use thiserror::Error;

/// OpenWLAN error type
#[derive(Error, Debug)]
pub enum WlanError {
    /// Malformed hardware address
    #[error("invalid BSSID: {0}")]
    InvalidBssid(String),

    /// SSID longer than 32 bytes
    #[error("invalid SSID: {0}")]
    InvalidSsid(String),

    /// Configuration rejected by validation
    #[error("config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for OpenWLAN
pub type WlanResult<T> = Result<T, WlanError>;
