use crate::model::Record;
use crate::validation::{Checker, Form, Submission};
use docstore::Document;
use serde::{Deserialize, Serialize};

/// Equipment category an item belongs to, e.g. "Main Hand".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    pub description: String,
}

impl Document for Slot {
    const COLLECTION: &'static str = "slots";
}

impl Record for Slot {
    const KIND: &'static str = "slot";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotForm {
    pub name: String,
    pub description: String,
}

impl From<&Slot> for SlotForm {
    fn from(slot: &Slot) -> Self {
        Self { name: slot.name.clone(), description: slot.description.clone() }
    }
}

impl Form for SlotForm {
    type Target = Slot;

    fn sanitize(self) -> Submission<Self> {
        let mut checker = Checker::new();
        let name = checker
            .field("name", &self.name)
            .len_between(3, 100, "Slot name must contain between 3 and 100 characters.")
            .escape()
            .value();
        let description = checker
            .field("description", &self.description)
            .len_between(4, 200, "Slot description must contain between 4 and 200 characters.")
            .escape()
            .value();
        let slot = Slot { name: name.clone(), description: description.clone() };
        checker.submit(SlotForm { name, description }, Some(slot))
    }
}
