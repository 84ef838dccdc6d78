//! One-hop joins from records to the records their foreign keys point at.
//!
//! A reference whose target was deleted resolves to `None` and is shown as a null field.

use crate::model::{Item, ItemInstance, Present, Seller, Slot};
use docstore::{AppError, Collection, Stored};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct ItemWithSlot {
    pub item: Stored<Item>,
    pub slot: Option<Stored<Slot>>,
}

#[derive(Debug, Clone)]
pub struct InstanceWithRefs {
    pub instance: Stored<ItemInstance>,
    pub item: Option<Stored<Item>>,
    pub seller: Option<Stored<Seller>>,
}

pub async fn item_with_slot(slots: &Collection<Slot>, item: Stored<Item>) -> Result<ItemWithSlot, AppError> {
    let slot = slots.get(&item.slot).await?;
    Ok(ItemWithSlot { item, slot })
}

pub async fn items_with_slots(slots: &Collection<Slot>, items: Vec<Stored<Item>>) -> Result<Vec<ItemWithSlot>, AppError> {
    let found = slots.get_many(items.iter().map(|i| i.slot.clone())).await?;
    Ok(items
        .into_iter()
        .map(|item| ItemWithSlot { slot: found.get(&item.slot).cloned(), item })
        .collect())
}

pub async fn instances_with_refs(
    items: &Collection<Item>,
    sellers: &Collection<Seller>,
    instances: Vec<Stored<ItemInstance>>,
) -> Result<Vec<InstanceWithRefs>, AppError> {
    let (found_items, found_sellers) = tokio::try_join!(
        items.get_many(instances.iter().map(|i| i.item.clone())),
        sellers.get_many(instances.iter().map(|i| i.seller.clone())),
    )?;
    Ok(instances
        .into_iter()
        .map(|instance| InstanceWithRefs {
            item: found_items.get(&instance.item).cloned(),
            seller: found_sellers.get(&instance.seller).cloned(),
            instance,
        })
        .collect())
}

fn replace_ref(mut base: Value, field: &str, target: Value) -> Value {
    if let Value::Object(map) = &mut base {
        if let Some(id) = map.remove(field) {
            map.insert(format!("{}_id", field), id);
        }
        map.insert(field.to_string(), target);
    }
    base
}

impl Present for ItemWithSlot {
    fn present(&self) -> Value {
        replace_ref(self.item.present(), "slot", self.slot.present())
    }
}

impl Present for InstanceWithRefs {
    fn present(&self) -> Value {
        let base = replace_ref(self.instance.present(), "item", self.item.present());
        replace_ref(base, "seller", self.seller.present())
    }
}
