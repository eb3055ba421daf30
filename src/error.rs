//! Error types for the harvester.
//!
//! One library-level error enum with detailed context per failure site.
//! Recoverable data gaps (missing XML elements, absent geographic codes)
//! are never errors; they surface as absent values or problem notes on the
//! record instead.

use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Invalid KMB identifier.
    #[error("Invalid KMB id: '{0}'. Expected a numeric identifier (e.g., 16000300035205)")]
    InvalidKmbId(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// All retry attempts exhausted.
    #[error("All {attempts} attempts failed: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Missing required XML element.
    #[error("Missing required XML element: {element} in {context}")]
    MissingElement { element: String, context: String },

    /// A depicted URI matched a registry prefix but the identifier does not
    /// have the expected shape. This signals a change in the upstream URI
    /// grammar and must not be swallowed.
    #[error("Depicted resource starts with '{prefix}' but the identifier has the wrong format: {url}")]
    InvalidDepicted { prefix: String, url: String },

    /// Failed to load a mapping file.
    #[error("Failed to load mapping file {file}: {source}")]
    MappingLoad {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to load the harvest settings file.
    #[error("Failed to load settings file {file}: {source}")]
    SettingsLoad {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvestError>;
