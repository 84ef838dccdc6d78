use crate::model::Record;
use crate::validation::{Checker, Form, Submission};
use docstore::{DocId, Document};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    Legendary,
    Epic,
    Rare,
    Uncommon,
    Common,
    Poor,
}

impl Quality {
    pub const ALL: [Quality; 6] = [
        Quality::Legendary,
        Quality::Epic,
        Quality::Rare,
        Quality::Uncommon,
        Quality::Common,
        Quality::Poor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Legendary => "Legendary",
            Quality::Epic => "Epic",
            Quality::Rare => "Rare",
            Quality::Uncommon => "Uncommon",
            Quality::Common => "Common",
            Quality::Poor => "Poor",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Quality::as_str).collect()
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| format!("Invalid value for Quality: {}", s))
    }
}

/// Catalog definition of a good, assigned to a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub description: String,
    pub quality: Quality,
    pub slot: DocId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,
}

impl Document for Item {
    const COLLECTION: &'static str = "items";
}

impl Record for Item {
    const KIND: &'static str = "item";
}

/// Text fields of the item form. The optional image travels separately as an upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemForm {
    pub name: String,
    pub description: String,
    pub quality: String,
    pub slot: String,
}

impl From<&Item> for ItemForm {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            quality: item.quality.to_string(),
            slot: item.slot.to_string(),
        }
    }
}

impl Form for ItemForm {
    type Target = Item;

    fn sanitize(self) -> Submission<Self> {
        let mut checker = Checker::new();
        let name = checker.field("name", &self.name).min_len(1, "Item name must not be empty.").escape().value();
        let description = checker
            .field("description", &self.description)
            .min_len(3, "Item description must contain at least 3 characters.")
            .escape()
            .value();
        let quality = checker
            .field("quality", &self.quality)
            .min_len(1, "Quality must not be empty.")
            .escape()
            .one_of(&Quality::names(), "Quality must be one of Legendary, Epic, Rare, Uncommon, Common or Poor.")
            .value();
        let slot = checker.field("slot", &self.slot).min_len(1, "Slot must not be empty.").escape().value();

        let item = quality.parse::<Quality>().ok().map(|quality| Item {
            name: name.clone(),
            description: description.clone(),
            quality,
            slot: DocId::from(slot.as_str()),
            img_url: None,
        });
        checker.submit(ItemForm { name, description, quality, slot }, item)
    }
}
