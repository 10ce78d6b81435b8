//! Physical table names, with the installation's table prefix applied.

use crate::model::ValueKind;

pub const ITEM_TABLE: &str = "custom_item";
pub const ITEM_CONTACT_TABLE: &str = "custom_item_xref_contact";
pub const ITEM_ITEM_TABLE: &str = "custom_item_xref_custom_item";

/// Resolves the fixed schema's table names under a prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableNames {
    prefix: String,
}

impl TableNames {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn table(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    pub fn items(&self) -> String {
        self.table(ITEM_TABLE)
    }

    pub fn item_contact(&self) -> String {
        self.table(ITEM_CONTACT_TABLE)
    }

    pub fn item_item(&self) -> String {
        self.table(ITEM_ITEM_TABLE)
    }

    pub fn value_table(&self, kind: ValueKind) -> String {
        self.table(kind.table_name())
    }
}
