//! Sample inventory: six sellers, three slots, four items and five listings.
//!
//! Records go through the regular create operations, so they are validated and escaped like
//! anything posted from a form.

use crate::err::CatalogError;
use crate::model::{ItemForm, ItemInstanceForm, SellerForm, SlotForm};
use crate::service::{Catalog, WriteOutcome};
use docstore::{info, Stored};
use futures::future::try_join_all;
use std::fmt::Debug;

const SELLERS: [(&str, &str); 6] = [
    ("Erbag", "Merrybang"),
    ("Groodley", "Altertail"),
    ("Axle", "Goldpinch"),
    ("Kizz", "Sharpwheedle"),
    ("Golganar", "Firehammer"),
    ("Gar", "Flamebrew"),
];

const SLOTS: [(&str, &str); 3] = [
    ("Main Hand", "Main handed weapon"),
    ("One-Hand", "One handed weapon"),
    ("Two-Hand", "Two handed weapon"),
];

/// name, description, quality, slot index
const ITEMS: [(&str, &str, &str, usize); 4] = [
    ("Titansteel Bonecrusher", "Main Hand Mace - Item level 200 - Speed 2.50", "Epic", 0),
    ("Skill's Fang", "Main Hand Dagger - Item level 187 - Speed 1.70", "Rare", 0),
    ("The Dusk Blade", "One-Hand Dagger - Item level 200 - Speed 1.80", "Epic", 1),
    ("Rugged Polearm", "Two-Hand Polearm - Item level 158 - Speed 3.50", "Uncommon", 2),
];

/// item index, seller index, stocks, price
const INSTANCES: [(usize, usize, u32, &str); 5] = [
    (0, 0, 3, "1200.00"),
    (1, 1, 8, "2200.00"),
    (0, 2, 1, "1400.00"),
    (2, 3, 22, "1600.00"),
    (3, 4, 5, "2500.00"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub sellers: usize,
    pub slots: usize,
    pub items: usize,
    pub instances: usize,
}

fn saved<F: Debug, D>(what: &str, outcome: WriteOutcome<F, D>) -> Result<Stored<D>, CatalogError> {
    match outcome {
        WriteOutcome::Saved(stored) | WriteOutcome::Duplicate(stored) => Ok(stored),
        WriteOutcome::Rejected(rejected) => Err(CatalogError::Seed(format!("{}: {:?}", what, rejected.errors))),
        WriteOutcome::Missing => Err(CatalogError::Seed(format!("{}: record vanished", what))),
    }
}

fn id_at<D>(records: &[Stored<D>], index: usize, what: &str) -> Result<String, CatalogError> {
    records
        .get(index)
        .map(|r| r.id.to_string())
        .ok_or_else(|| CatalogError::Seed(format!("{} #{} was not created", what, index)))
}

pub async fn seed(catalog: &Catalog) -> Result<SeedSummary, CatalogError> {
    info!("Adding sellers");
    let sellers = try_join_all(SELLERS.iter().map(|(first_name, last_name)| async move {
        let form = SellerForm { first_name: first_name.to_string(), last_name: last_name.to_string() };
        saved(first_name, catalog.create_seller(form).await?)
    }))
    .await?;

    info!("Adding slots");
    let slots = try_join_all(SLOTS.iter().map(|(name, description)| async move {
        let form = SlotForm { name: name.to_string(), description: description.to_string() };
        saved(name, catalog.create_slot(form).await?)
    }))
    .await?;

    info!("Adding items");
    let mut item_forms = Vec::with_capacity(ITEMS.len());
    for (name, description, quality, slot) in ITEMS {
        let slot = id_at(&slots, slot, "Slot")?;
        item_forms.push((name, ItemForm { name: name.to_string(), description: description.to_string(), quality: quality.to_string(), slot }));
    }
    let items = try_join_all(item_forms.into_iter().map(|(name, form)| async move {
        saved(name, catalog.create_item(form, None).await?)
    }))
    .await?;

    info!("Adding item instances");
    let mut instance_forms = Vec::with_capacity(INSTANCES.len());
    for (item, seller, num_of_stocks, price) in INSTANCES {
        let form = ItemInstanceForm {
            item: id_at(&items, item, "Item")?,
            seller: id_at(&sellers, seller, "Seller")?,
            num_of_stocks: num_of_stocks.to_string(),
            price: price.to_string(),
        };
        instance_forms.push(form);
    }
    let instances = try_join_all(instance_forms.into_iter().map(|form| async move {
        saved("item instance", catalog.create_instance(form).await?)
    }))
    .await?;

    let summary = SeedSummary { sellers: sellers.len(), slots: slots.len(), items: items.len(), instances: instances.len() };
    info!("Seeded {:?}", summary);
    Ok(summary)
}
