//! Catalog operations over the four collections, independent of HTTP.

pub mod item;
pub mod item_instance;
pub mod seller;
pub mod slot;

pub use item::ItemDetail;
pub use item_instance::InstanceFormOptions;
pub use seller::SellerDetail;
pub use slot::SlotDetail;

use crate::err::CatalogError;
use crate::guard::DeleteGuard;
use crate::model::{Item, ItemInstance, Seller, Slot};
use crate::upload::{BlobStore, LocalBlobStore};
use crate::validation::{Form, Rejected, Submission};
use docstore::{Collection, DocId, Document, FilterOp, Query, Storage, Stored};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Result of a create or update submission.
#[derive(Debug)]
pub enum WriteOutcome<F, D> {
    Saved(Stored<D>),
    /// Create matched an existing record that must stay unique.
    Duplicate(Stored<D>),
    Rejected(Rejected<F>),
    /// Update of an id that does not exist.
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub item_count: usize,
    pub item_instance_count: usize,
    pub item_instance_stock_count: usize,
    pub seller_count: usize,
    pub slot_count: usize,
}

pub struct Catalog {
    pub slots: Collection<Slot>,
    pub items: Collection<Item>,
    pub sellers: Collection<Seller>,
    pub instances: Collection<ItemInstance>,
    guard: DeleteGuard,
    blobs: Arc<dyn BlobStore>,
}

impl Catalog {
    pub fn new(storage: &Storage, guard: DeleteGuard, blobs: Arc<dyn BlobStore>) -> Result<Self, CatalogError> {
        Ok(Self {
            slots: storage.collection()?,
            items: storage.collection()?,
            sellers: storage.collection()?,
            instances: storage.collection()?,
            guard,
            blobs,
        })
    }

    /// Catalog over a fresh temporary database, with delete code "123" and images in a temp dir.
    pub async fn temp(name: &str) -> Result<Self, CatalogError> {
        let storage = Storage::temp(name, true).await?;
        let blob_dir = std::env::temp_dir().join("catalog").join(format!("{}_{}_uploads", name, rand::random::<u64>()));
        let blobs = LocalBlobStore::new(blob_dir, "/uploads")?;
        Catalog::new(&storage, DeleteGuard::new("123"), Arc::new(blobs))
    }

    pub fn blobs(&self) -> Arc<dyn BlobStore> {
        Arc::clone(&self.blobs)
    }

    /// Entity counts for the home page, fetched concurrently.
    pub async fn dashboard(&self) -> Result<Dashboard, CatalogError> {
        let (item_count, item_instance_count, item_instance_stock_count, seller_count, slot_count) = tokio::try_join!(
            self.items.count(Query::all()),
            self.instances.count(Query::all()),
            self.instances.count(Query::all().filter("num_of_stocks", FilterOp::Gt(json!(0)))),
            self.sellers.count(Query::all()),
            self.slots.count(Query::all()),
        )?;
        Ok(Dashboard { item_count, item_instance_count, item_instance_stock_count, seller_count, slot_count })
    }
}

/// Rejects `field` when its non-empty id does not resolve in `collection`.
pub(crate) async fn check_ref<F: Form, D: Document>(
    collection: &Collection<D>,
    submission: &mut Submission<F>,
    field: &'static str,
    id: &str,
    message: &str,
) -> Result<(), CatalogError> {
    if !id.is_empty() && collection.get(&DocId::from(id)).await?.is_none() {
        submission.reject(field, message);
    }
    Ok(())
}
