//! # custom-objects
//!
//! Relationship-path query compiler for custom objects in a contact
//! platform.
//!
//! ## Architecture
//!
//! A segment filter on a custom field becomes the set of contacts linked,
//! directly or through chains of item–item links, to an item whose value
//! satisfies the filter:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          RawSegmentFilter (platform JSON record)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [segment]
//! ┌─────────────────────────────────────────────────────────┐
//! │   SegmentFilter: CustomField | CustomItem | Native       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [query]  metadata + enumerate(depth)
//! ┌─────────────────────────────────────────────────────────┐
//! │   UnionQueryContainer: one SELECT contact_id per path    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql]
//! ┌─────────────────────────────────────────────────────────┐
//! │   contact.id [NOT] IN (SELECT ... UNION ALL ...)         │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod compile;
pub mod config;
pub mod evaluate;
pub mod metadata;
pub mod model;
pub mod query;
pub mod report;
pub mod segment;
pub mod sql;

// Re-export SQL submodules at crate level
pub use sql::dialect;
pub use sql::expr;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compile::{compile_filter, compile_filter_json, CompileOptions, CompileOutput};
    pub use crate::config::Settings;
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::evaluate::{ContactFilterEvaluator, Evaluation, QueryExecutor, SqliteExecutor};
    pub use crate::metadata::{Catalog, FieldMetadataProvider, FieldTypeRegistry, TableNames};
    pub use crate::model::{
        ContactId, CustomField, CustomItem, CustomObject, FieldId, FieldType, ItemId, ObjectId,
        ObjectKind, Operator,
    };
    pub use crate::query::{
        AliasScope, CustomFieldQueryCompiler, DepthLimit, FieldFilter, FilterValue, ItemFilter,
        QueryError, QueryResult, UnionQueryContainer, ValueCondition,
    };
    pub use crate::segment::{
        ContactRestriction, RawSegmentFilter, SegmentFilter, SegmentFilterDispatcher, SegmentQuery,
    };
    pub use crate::sql::{ParamValue, Parameters, Query};
}
