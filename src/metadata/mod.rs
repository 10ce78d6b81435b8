//! Field metadata: what the compiler needs to know about custom fields.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            FieldMetadataProvider             │
//! │  resolve_field_by_id()  resolve_value_table()│
//! └──────────────────────────────────────────────┘
//!            ▲                        │
//!            │ implements             ▼ delegates
//! ┌────────────────────┐   ┌────────────────────┐
//! │ Catalog (TOML)     │──▶│ FieldTypeRegistry  │
//! └────────────────────┘   │ + TableNames       │
//!                          └────────────────────┘
//! ```

mod catalog;
mod provider;
mod tables;

pub use catalog::{Catalog, CatalogError};
pub use provider::{FieldMetadataProvider, FieldTypeRegistry};
pub use tables::{TableNames, ITEM_CONTACT_TABLE, ITEM_ITEM_TABLE, ITEM_TABLE};
