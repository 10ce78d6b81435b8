//! Relationship-path query compilation.
//!
//! A filter on a custom field matches contacts linked to an item whose
//! value satisfies the filter, either directly or through a chain of
//! item–item links. Each chain shape becomes one fragment; the fragments
//! are combined with `UNION ALL`.
//!
//! ```text
//!   FieldFilter
//!       │
//!       ▼ [CustomFieldQueryCompiler]  resolve field + value table
//!   enumerate(depth) ──▶ RelationshipPath × N
//!       │
//!       ▼ [QueryFragmentBuilder]      one SELECT contact_id per path
//!   UnionQueryContainer ──▶ render(dialect) ──▶ (sql, params)
//! ```

mod compiler;
mod condition;
mod error;
mod fragment;
mod path;
mod union;

pub use compiler::{AliasScope, CustomFieldQueryCompiler, FieldFilter, ItemFilter};
pub use condition::{FilterValue, ValueCondition};
pub use error::{QueryError, QueryResult};
pub use fragment::{Fragment, PathSource, QueryFragmentBuilder};
pub use path::{enumerate, path_count, DepthLimit, Direction, Hop, RelationshipPath};
pub use union::UnionQueryContainer;
