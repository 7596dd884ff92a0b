//! Page document model for Vitrine.
//!
//! Parses page markup into a flat arena of elements in document order and
//! answers the handful of structural queries the page components need
//! (attribute markers, nearest ancestor, descendant ranges, ids, classes).

pub mod css;
pub mod document;
pub mod html;

pub use document::{ElementId, PageDocument, PageElement};
pub use html::{document_from_file, document_from_html};
