use crate::err::CatalogError;
use crate::guard::{DeleteOutcome, DeletePage, Verdict};
use crate::model::{Item, ItemInstance, ItemInstanceForm, Seller};
use crate::populate::{self, InstanceWithRefs};
use crate::service::{check_ref, Catalog, WriteOutcome};
use crate::validation::{Form, Rejected};
use docstore::{DocId, Query, SortOrder, Stored};

/// Items and sellers offered by the listing form.
#[derive(Debug, Clone)]
pub struct InstanceFormOptions {
    pub items: Vec<Stored<Item>>,
    pub sellers: Vec<Stored<Seller>>,
}

impl Catalog {
    pub async fn instance_list(&self) -> Result<Vec<InstanceWithRefs>, CatalogError> {
        let instances = self.instances.find(Query::all()).await?;
        Ok(populate::instances_with_refs(&self.items, &self.sellers, instances).await?)
    }

    pub async fn instance(&self, id: &DocId) -> Result<Option<Stored<ItemInstance>>, CatalogError> {
        Ok(self.instances.get(id).await?)
    }

    pub async fn instance_detail(&self, id: &DocId) -> Result<Option<InstanceWithRefs>, CatalogError> {
        let Some(instance) = self.instance(id).await? else {
            return Ok(None);
        };
        let mut joined = populate::instances_with_refs(&self.items, &self.sellers, vec![instance]).await?;
        Ok(joined.pop())
    }

    async fn items_by_name(&self) -> Result<Vec<Stored<Item>>, CatalogError> {
        Ok(self.items.find(Query::all().sort_by("name", SortOrder::Asc)).await?)
    }

    pub async fn instance_form_options(&self) -> Result<InstanceFormOptions, CatalogError> {
        let (items, sellers) = tokio::try_join!(self.items_by_name(), self.seller_list())?;
        Ok(InstanceFormOptions { items, sellers })
    }

    async fn check_instance(&self, form: ItemInstanceForm) -> Result<Result<ItemInstance, Rejected<ItemInstanceForm>>, CatalogError> {
        let mut submission = form.sanitize();
        let (item, seller) = (submission.form.item.clone(), submission.form.seller.clone());
        check_ref(&self.items, &mut submission, "item", &item, "Selected item does not exist.").await?;
        check_ref(&self.sellers, &mut submission, "seller", &seller, "Selected seller does not exist.").await?;
        Ok(submission.into_result())
    }

    pub async fn create_instance(&self, form: ItemInstanceForm) -> Result<WriteOutcome<ItemInstanceForm, ItemInstance>, CatalogError> {
        match self.check_instance(form).await? {
            Ok(instance) => Ok(WriteOutcome::Saved(self.instances.insert(instance).await?)),
            Err(rejected) => Ok(WriteOutcome::Rejected(rejected)),
        }
    }

    pub async fn update_instance(&self, id: &DocId, form: ItemInstanceForm) -> Result<WriteOutcome<ItemInstanceForm, ItemInstance>, CatalogError> {
        if self.instance(id).await?.is_none() {
            return Ok(WriteOutcome::Missing);
        }
        match self.check_instance(form).await? {
            Ok(instance) => Ok(self.instances.replace(id, instance).await?.map_or(WriteOutcome::Missing, WriteOutcome::Saved)),
            Err(rejected) => Ok(WriteOutcome::Rejected(rejected)),
        }
    }

    /// Listings have no dependents; the page only asks for the confirmation code.
    pub async fn instance_delete_page(&self, id: &DocId) -> Result<Option<DeletePage<ItemInstance, InstanceWithRefs>>, CatalogError> {
        Ok(self.instance(id).await?.map(|instance| self.guard.confirm(instance, Vec::new())))
    }

    pub async fn delete_instance(&self, id: &DocId, code: &str) -> Result<DeleteOutcome<ItemInstance, InstanceWithRefs>, CatalogError> {
        let Some(instance) = self.instance(id).await? else {
            return Ok(DeleteOutcome::Missing);
        };
        match self.guard.attempt(instance, Vec::new(), code) {
            Verdict::Proceed(instance) => {
                self.instances.remove(&instance.id).await?;
                Ok(DeleteOutcome::Deleted)
            }
            Verdict::Blocked(page) => Ok(DeleteOutcome::Blocked(page)),
        }
    }
}
