//! Segment filters: parsing the platform's filter records and attaching
//! compiled custom object filters to the contact query.

mod dispatcher;
mod filter;

pub use dispatcher::{ContactRestriction, NativeFilterHandler, SegmentFilterDispatcher, SegmentQuery};
pub use filter::{Glue, RawSegmentFilter, SegmentFilter, CUSTOM_OBJECT};
