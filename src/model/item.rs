//! Custom items and the two junction records that link them.

use serde::{Deserialize, Serialize};

use super::{ContactId, ItemId, ObjectId};

/// A record of a custom object. Field values live in the value tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CustomItem {
    pub id: ItemId,
    pub object_id: ObjectId,
    pub name: String,
}

impl CustomItem {
    pub fn new(id: ItemId, object_id: ObjectId, name: &str) -> Self {
        Self {
            id,
            object_id,
            name: name.into(),
        }
    }
}

/// Row of `custom_item_xref_contact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ItemContactLink {
    pub custom_item_id: ItemId,
    pub contact_id: ContactId,
}

impl ItemContactLink {
    pub fn new(custom_item_id: ItemId, contact_id: ContactId) -> Self {
        Self {
            custom_item_id,
            contact_id,
        }
    }
}

/// Row of `custom_item_xref_custom_item`.
///
/// The pair is stored once, with the smaller id in `lower`. Queries walk
/// the link in either direction instead of storing it twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ItemItemLink {
    lower: ItemId,
    higher: ItemId,
}

impl ItemItemLink {
    /// Link two items, ordering the ids canonically.
    pub fn new(a: ItemId, b: ItemId) -> Self {
        if a <= b {
            Self { lower: a, higher: b }
        } else {
            Self { lower: b, higher: a }
        }
    }

    pub fn lower(&self) -> ItemId {
        self.lower
    }

    pub fn higher(&self) -> ItemId {
        self.higher
    }

    /// The item on the other side of the link, if `item` is part of it.
    pub fn other(&self, item: ItemId) -> Option<ItemId> {
        if item == self.lower {
            Some(self.higher)
        } else if item == self.higher {
            Some(self.lower)
        } else {
            None
        }
    }
}

impl<'de> Deserialize<'de> for ItemItemLink {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            lower: ItemId,
            higher: ItemId,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(ItemItemLink::new(raw.lower, raw.higher))
    }
}
