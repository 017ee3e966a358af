//! Extension catalog layer
//!
//! This module merges the locally installed extensions with the remote
//! extension catalog into one group per extension, holding every known version.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Source    │────▶│    Cache    │────▶│   Builder   │◀──── Local scan
//! │   (fetch)   │     │  (storage)  │     │   (merge)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                                         ┌─────────────┐
//!                                         │    View     │
//!                                         │(list/detail)│
//!                                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`builder`]: Version catalog builder and per-extension version groups
//! - [`cache`]: SQLite cache of the last fetched catalog
//! - [`error`]: Error types for cache, fetch and scan operations
//! - [`refresh`]: Fetching the catalog when the cache is stale
//! - [`source`]: Trait for fetching the catalog from a remote source
//! - [`sources`]: HTTP catalog and local extensions folder
//! - [`types`]: `ExtensionRecord` and `ViewFilter`
//! - [`version`]: Dotted version comparison
//! - [`view`]: Sorted list, selection and install decisions

pub mod builder;
pub mod cache;
pub mod error;
pub mod refresh;
pub mod source;
pub mod sources;
pub mod types;
pub mod version;
pub mod view;
