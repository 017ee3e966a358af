//! Concrete catalog and installed-extension sources

mod http;
mod local;

pub use http::HttpCatalog;
pub use local::LocalExtensions;
