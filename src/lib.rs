//! KMB Harvester - Download and process image metadata from the
//! Kulturmiljöbild (KMB) search API.
//!
//! This crate turns per-image XML metadata records from the K-samsök search
//! API into normalized, richly-annotated records: title, license and
//! attribution, geolocation, registry citations and classification
//! categories.
//!
//! # Example
//!
//! ```
//! use kmb_harvester::config;
//!
//! // Validate a KMB id
//! assert!(config::validate_kmb_id("16000300035205").is_ok());
//! assert!(config::validate_kmb_id("not-an-id").is_err());
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants, URL builders and validation
//! - [`types`]: The central [`KmbRecord`] data type
//! - [`error`]: Error types and Result alias
//! - [`xml`]: XML navigation utilities
//! - [`extract`]: Declarative field extraction from record elements
//! - [`normalize`]: Byline, date and geographic-id normalizers
//! - [`depicted`]: Registry citation resolution for depicted entities
//! - [`license`]: License and attribution resolution
//! - [`record`]: The per-record transformation pipeline
//! - [`mappings`]: Read-only lookup tables for category generation
//! - [`probe`]: Category-existence collaborators
//! - [`categories`]: Tiered category assignment
//! - [`description`]: Wikitext rendering for processed records
//! - [`api`]: Search API client with paging
//! - [`process`]: Batch driver for the category-generation phase
//! - [`http`]: HTTP client with retry logic
//! - [`output`]: JSON output writers
//! - [`cli`]: Command-line interface

pub mod api;
pub mod categories;
pub mod cli;
pub mod config;
pub mod depicted;
pub mod description;
pub mod error;
pub mod extract;
pub mod http;
pub mod license;
pub mod mappings;
pub mod normalize;
pub mod output;
pub mod probe;
pub mod process;
pub mod record;
pub mod types;
pub mod xml;

// Re-export main functions
pub use record::parse_record;

// Re-export commonly used items
pub use categories::{Categories, CategoryAssigner};
pub use config::validate_kmb_id;
pub use error::{HarvestError, Result};
pub use mappings::Mappings;
pub use probe::CategoryProbe;
pub use types::KmbRecord;
