//! Core types - pure abstractions shared across the codebase.

mod record;
mod segment;

pub use record::{FieldValue, LinkSys, LocalizedField, ParentRef, RecordRef, RecordSnapshot};
pub use segment::{PathSegment, SEPARATOR};
