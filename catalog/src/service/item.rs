use crate::err::CatalogError;
use crate::guard::{DeleteOutcome, DeletePage, Verdict};
use crate::model::{Item, ItemForm, ItemInstance, Slot};
use crate::populate::{self, InstanceWithRefs, ItemWithSlot};
use crate::service::{check_ref, Catalog, WriteOutcome};
use crate::upload::ImageUpload;
use crate::validation::Form;
use docstore::{warn, DocId, Query, SortOrder, Stored};

#[derive(Debug, Clone)]
pub struct ItemDetail {
    pub item: ItemWithSlot,
    pub instances: Vec<InstanceWithRefs>,
}

const UNKNOWN_SLOT: &str = "Selected slot does not exist.";

impl Catalog {
    /// All items ordered by their stored quality value, each with its slot.
    pub async fn item_list(&self) -> Result<Vec<ItemWithSlot>, CatalogError> {
        let items = self.items.find(Query::all().sort_by("quality", SortOrder::Asc)).await?;
        Ok(populate::items_with_slots(&self.slots, items).await?)
    }

    pub async fn item(&self, id: &DocId) -> Result<Option<Stored<Item>>, CatalogError> {
        Ok(self.items.get(id).await?)
    }

    async fn item_instances(&self, id: &DocId) -> Result<Vec<Stored<ItemInstance>>, CatalogError> {
        Ok(self.instances.find(Query::all().eq("item", id.as_str())).await?)
    }

    pub async fn item_detail(&self, id: &DocId) -> Result<Option<ItemDetail>, CatalogError> {
        let (item, instances) = tokio::try_join!(self.item(id), self.item_instances(id))?;
        let Some(item) = item else {
            return Ok(None);
        };
        let (item, instances) = tokio::try_join!(
            populate::item_with_slot(&self.slots, item),
            populate::instances_with_refs(&self.items, &self.sellers, instances),
        )?;
        Ok(Some(ItemDetail { item, instances }))
    }

    /// Slots offered by the item form.
    pub async fn slot_options(&self) -> Result<Vec<Stored<Slot>>, CatalogError> {
        self.slot_list().await
    }

    async fn store_image(&self, image: ImageUpload) -> Result<String, CatalogError> {
        let blobs = self.blobs();
        tokio::task::spawn_blocking(move || blobs.put(&image)).await?
    }

    async fn discard_image(&self, url: String) {
        let blobs = self.blobs();
        let removed = tokio::task::spawn_blocking(move || blobs.remove(&url).map_err(|e| (url, e))).await;
        match removed {
            Ok(Ok(())) => {}
            Ok(Err((url, e))) => warn!("Unable to remove image {}: {}", url, e),
            Err(e) => warn!("Image removal task failed: {}", e),
        }
    }

    /// Validates the form and the slot reference; the image is only stored once the item is valid.
    pub async fn create_item(&self, form: ItemForm, image: Option<ImageUpload>) -> Result<WriteOutcome<ItemForm, Item>, CatalogError> {
        let mut submission = form.sanitize();
        let slot = submission.form.slot.clone();
        check_ref(&self.slots, &mut submission, "slot", &slot, UNKNOWN_SLOT).await?;
        let mut item = match submission.into_result() {
            Ok(item) => item,
            Err(rejected) => return Ok(WriteOutcome::Rejected(rejected)),
        };
        if let Some(image) = image {
            item.img_url = Some(self.store_image(image).await?);
        }
        Ok(WriteOutcome::Saved(self.items.insert(item).await?))
    }

    /// Without a new image the current one is kept; a replaced image is removed.
    pub async fn update_item(&self, id: &DocId, form: ItemForm, image: Option<ImageUpload>) -> Result<WriteOutcome<ItemForm, Item>, CatalogError> {
        let Some(current) = self.item(id).await? else {
            return Ok(WriteOutcome::Missing);
        };
        let mut submission = form.sanitize();
        let slot = submission.form.slot.clone();
        check_ref(&self.slots, &mut submission, "slot", &slot, UNKNOWN_SLOT).await?;
        let item = match submission.into_result() {
            Ok(item) => item,
            Err(rejected) => return Ok(WriteOutcome::Rejected(rejected)),
        };
        let saved = self.replace_item(id, item, image, current.doc.img_url).await?;
        Ok(saved.map_or(WriteOutcome::Missing, WriteOutcome::Saved))
    }

    /// Stores the new image, if any, and swaps the document. Whichever image ends up unreferenced is removed:
    /// the old one after a successful swap, the new one when the item vanished in the meantime.
    async fn replace_item(&self, id: &DocId, mut item: Item, image: Option<ImageUpload>, old: Option<String>) -> Result<Option<Stored<Item>>, CatalogError> {
        let fresh = match image {
            Some(image) => Some(self.store_image(image).await?),
            None => None,
        };
        item.img_url = fresh.clone().or_else(|| old.clone());
        match self.items.replace(id, item).await? {
            Some(saved) => {
                if let (Some(_), Some(old)) = (&fresh, old) {
                    self.discard_image(old).await;
                }
                Ok(Some(saved))
            }
            None => {
                if let Some(fresh) = fresh {
                    self.discard_image(fresh).await;
                }
                Ok(None)
            }
        }
    }

    async fn item_dependents(&self, id: &DocId) -> Result<(Option<Stored<Item>>, Vec<InstanceWithRefs>), CatalogError> {
        let (item, instances) = tokio::try_join!(self.item(id), self.item_instances(id))?;
        let instances = populate::instances_with_refs(&self.items, &self.sellers, instances).await?;
        Ok((item, instances))
    }

    pub async fn item_delete_page(&self, id: &DocId) -> Result<Option<DeletePage<Item, InstanceWithRefs>>, CatalogError> {
        let (item, instances) = self.item_dependents(id).await?;
        Ok(item.map(|item| self.guard.confirm(item, instances)))
    }

    pub async fn delete_item(&self, id: &DocId, code: &str) -> Result<DeleteOutcome<Item, InstanceWithRefs>, CatalogError> {
        let (item, instances) = self.item_dependents(id).await?;
        let Some(item) = item else {
            return Ok(DeleteOutcome::Missing);
        };
        match self.guard.attempt(item, instances, code) {
            Verdict::Proceed(item) => {
                self.items.remove(&item.id).await?;
                if let Some(url) = item.doc.img_url {
                    self.discard_image(url).await;
                }
                Ok(DeleteOutcome::Deleted)
            }
            Verdict::Blocked(page) => Ok(DeleteOutcome::Blocked(page)),
        }
    }
}
