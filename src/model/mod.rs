//! Domain model: custom objects, their fields, items and links.
//!
//! Everything here is plain data. The compiler reads it and never mutates it.

pub mod field;
pub mod field_type;
pub mod item;
pub mod object;
pub mod operator;

pub use field::CustomField;
pub use field_type::{FieldType, ValueKind};
pub use item::{CustomItem, ItemContactLink, ItemItemLink};
pub use object::{CustomObject, ObjectKind};
pub use operator::Operator;

pub type ObjectId = i64;
pub type FieldId = i64;
pub type ItemId = i64;
pub type ContactId = i64;
