//! Page data extraction.
//!
//! A rendered page is captured once as a [`PageSnapshot`]; the extraction
//! engine then turns the snapshot into a [`PageProfile`] without touching
//! the browser again.

// Sub-modules
pub mod extractors;
pub mod js_scripts;
pub mod page_data;
pub mod schema;
pub mod snapshot;

// Re-exports for public API
pub use page_data::{ExtractOptions, extract_page_data, profile_photo_url};
pub use schema::{AdLibrary, AdStatus, ErrorRecord, PageProfile, PageRecord};
pub use snapshot::PageSnapshot;
