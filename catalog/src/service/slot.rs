use crate::err::CatalogError;
use crate::guard::{DeleteOutcome, DeletePage, Verdict};
use crate::model::{Item, Slot, SlotForm};
use crate::service::{Catalog, WriteOutcome};
use crate::validation::Form;
use docstore::{DocId, FilterOp, Query, SortOrder, Stored};

#[derive(Debug, Clone)]
pub struct SlotDetail {
    pub slot: Stored<Slot>,
    pub items: Vec<Stored<Item>>,
}

impl Catalog {
    pub async fn slot_list(&self) -> Result<Vec<Stored<Slot>>, CatalogError> {
        Ok(self.slots.find(Query::all().sort_by("name", SortOrder::Asc)).await?)
    }

    pub async fn slot(&self, id: &DocId) -> Result<Option<Stored<Slot>>, CatalogError> {
        Ok(self.slots.get(id).await?)
    }

    async fn slot_items(&self, id: &DocId) -> Result<Vec<Stored<Item>>, CatalogError> {
        Ok(self.items.find(Query::all().eq("slot", id.as_str()).sort_by("name", SortOrder::Asc)).await?)
    }

    pub async fn slot_detail(&self, id: &DocId) -> Result<Option<SlotDetail>, CatalogError> {
        let (slot, items) = tokio::try_join!(self.slot(id), self.slot_items(id))?;
        Ok(slot.map(|slot| SlotDetail { slot, items }))
    }

    async fn slot_named(&self, name: &str) -> Result<Option<Stored<Slot>>, CatalogError> {
        Ok(self.slots.find_one(Query::all().filter("name", FilterOp::EqIgnoreCase(name.to_string()))).await?)
    }

    /// Creating a slot whose name matches an existing one, ignoring case, yields that slot instead.
    pub async fn create_slot(&self, form: SlotForm) -> Result<WriteOutcome<SlotForm, Slot>, CatalogError> {
        let slot = match form.sanitize().into_result() {
            Ok(slot) => slot,
            Err(rejected) => return Ok(WriteOutcome::Rejected(rejected)),
        };
        if let Some(existing) = self.slot_named(&slot.name).await? {
            return Ok(WriteOutcome::Duplicate(existing));
        }
        Ok(WriteOutcome::Saved(self.slots.insert(slot).await?))
    }

    pub async fn update_slot(&self, id: &DocId, form: SlotForm) -> Result<WriteOutcome<SlotForm, Slot>, CatalogError> {
        if self.slot(id).await?.is_none() {
            return Ok(WriteOutcome::Missing);
        }
        let mut submission = form.sanitize();
        if submission.is_valid() {
            if let Some(other) = self.slot_named(&submission.form.name).await? {
                if &other.id != id {
                    submission.reject("name", "Another slot already uses this name.");
                }
            }
        }
        match submission.into_result() {
            Ok(slot) => Ok(self.slots.replace(id, slot).await?.map_or(WriteOutcome::Missing, WriteOutcome::Saved)),
            Err(rejected) => Ok(WriteOutcome::Rejected(rejected)),
        }
    }

    pub async fn slot_delete_page(&self, id: &DocId) -> Result<Option<DeletePage<Slot, Stored<Item>>>, CatalogError> {
        let (slot, items) = tokio::try_join!(self.slot(id), self.slot_items(id))?;
        Ok(slot.map(|slot| self.guard.confirm(slot, items)))
    }

    pub async fn delete_slot(&self, id: &DocId, code: &str) -> Result<DeleteOutcome<Slot, Stored<Item>>, CatalogError> {
        let (slot, items) = tokio::try_join!(self.slot(id), self.slot_items(id))?;
        let Some(slot) = slot else {
            return Ok(DeleteOutcome::Missing);
        };
        match self.guard.attempt(slot, items, code) {
            Verdict::Proceed(slot) => {
                self.slots.remove(&slot.id).await?;
                Ok(DeleteOutcome::Deleted)
            }
            Verdict::Blocked(page) => Ok(DeleteOutcome::Blocked(page)),
        }
    }
}
