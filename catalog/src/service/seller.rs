use crate::err::CatalogError;
use crate::guard::{DeleteOutcome, DeletePage, Verdict};
use crate::model::{ItemInstance, Seller, SellerForm};
use crate::populate::{self, InstanceWithRefs};
use crate::service::{Catalog, WriteOutcome};
use crate::validation::Form;
use docstore::{DocId, Query, SortOrder, Stored};

#[derive(Debug, Clone)]
pub struct SellerDetail {
    pub seller: Stored<Seller>,
    pub instances: Vec<InstanceWithRefs>,
}

impl Catalog {
    pub async fn seller_list(&self) -> Result<Vec<Stored<Seller>>, CatalogError> {
        Ok(self.sellers.find(Query::all().sort_by("first_name", SortOrder::Asc)).await?)
    }

    pub async fn seller(&self, id: &DocId) -> Result<Option<Stored<Seller>>, CatalogError> {
        Ok(self.sellers.get(id).await?)
    }

    async fn seller_instances(&self, id: &DocId) -> Result<Vec<InstanceWithRefs>, CatalogError> {
        let instances: Vec<Stored<ItemInstance>> = self.instances.find(Query::all().eq("seller", id.as_str())).await?;
        Ok(populate::instances_with_refs(&self.items, &self.sellers, instances).await?)
    }

    pub async fn seller_detail(&self, id: &DocId) -> Result<Option<SellerDetail>, CatalogError> {
        let (seller, instances) = tokio::try_join!(self.seller(id), self.seller_instances(id))?;
        Ok(seller.map(|seller| SellerDetail { seller, instances }))
    }

    pub async fn create_seller(&self, form: SellerForm) -> Result<WriteOutcome<SellerForm, Seller>, CatalogError> {
        match form.sanitize().into_result() {
            Ok(seller) => Ok(WriteOutcome::Saved(self.sellers.insert(seller).await?)),
            Err(rejected) => Ok(WriteOutcome::Rejected(rejected)),
        }
    }

    pub async fn update_seller(&self, id: &DocId, form: SellerForm) -> Result<WriteOutcome<SellerForm, Seller>, CatalogError> {
        if self.seller(id).await?.is_none() {
            return Ok(WriteOutcome::Missing);
        }
        match form.sanitize().into_result() {
            Ok(seller) => Ok(self.sellers.replace(id, seller).await?.map_or(WriteOutcome::Missing, WriteOutcome::Saved)),
            Err(rejected) => Ok(WriteOutcome::Rejected(rejected)),
        }
    }

    pub async fn seller_delete_page(&self, id: &DocId) -> Result<Option<DeletePage<Seller, InstanceWithRefs>>, CatalogError> {
        let (seller, instances) = tokio::try_join!(self.seller(id), self.seller_instances(id))?;
        Ok(seller.map(|seller| self.guard.confirm(seller, instances)))
    }

    pub async fn delete_seller(&self, id: &DocId, code: &str) -> Result<DeleteOutcome<Seller, InstanceWithRefs>, CatalogError> {
        let (seller, instances) = tokio::try_join!(self.seller(id), self.seller_instances(id))?;
        let Some(seller) = seller else {
            return Ok(DeleteOutcome::Missing);
        };
        match self.guard.attempt(seller, instances, code) {
            Verdict::Proceed(seller) => {
                self.sellers.remove(&seller.id).await?;
                Ok(DeleteOutcome::Deleted)
            }
            Verdict::Blocked(page) => Ok(DeleteOutcome::Blocked(page)),
        }
    }
}
