use crate::model::Record;
use crate::validation::{Checker, Form, Submission};
use docstore::{DocId, Document};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

pub const IN_STOCK: &str = "In-stock";
pub const OUT_OF_STOCK: &str = "Out-of-stock";

/// A seller's listing of an item with its stock and price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInstance {
    pub item: DocId,
    pub seller: DocId,
    pub num_of_stocks: u32,
    pub price: Decimal,
}

impl ItemInstance {
    pub fn stock(&self) -> &'static str {
        if self.num_of_stocks > 0 {
            IN_STOCK
        } else {
            OUT_OF_STOCK
        }
    }
}

impl Document for ItemInstance {
    const COLLECTION: &'static str = "item_instances";
}

impl Record for ItemInstance {
    const KIND: &'static str = "iteminstance";

    fn derived(&self, out: &mut Map<String, Value>) {
        out.insert("stock".into(), Value::String(self.stock().to_string()));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemInstanceForm {
    pub item: String,
    pub seller: String,
    pub num_of_stocks: String,
    pub price: String,
}

impl From<&ItemInstance> for ItemInstanceForm {
    fn from(instance: &ItemInstance) -> Self {
        Self {
            item: instance.item.to_string(),
            seller: instance.seller.to_string(),
            num_of_stocks: instance.num_of_stocks.to_string(),
            price: instance.price.to_string(),
        }
    }
}

impl Form for ItemInstanceForm {
    type Target = ItemInstance;

    fn sanitize(self) -> Submission<Self> {
        let mut checker = Checker::new();
        let item = checker.field("item", &self.item).min_len(1, "Item must be specified.").escape().value();
        let seller = checker.field("seller", &self.seller).min_len(1, "Seller must be specified.").escape().value();
        let num_of_stocks = checker
            .field("num_of_stocks", &self.num_of_stocks)
            .int_between(1, 100, "Number of stocks must be a whole number between 1 and 100.")
            .value();
        let price = checker
            .field("price", &self.price)
            .decimal_min(Decimal::ONE, "Price must be a decimal number of at least 1.")
            .value();

        let instance = match (num_of_stocks.parse::<u32>(), Decimal::from_str(&price)) {
            (Ok(num_of_stocks), Ok(price)) => Some(ItemInstance {
                item: DocId::from(item.as_str()),
                seller: DocId::from(seller.as_str()),
                num_of_stocks,
                price,
            }),
            _ => None,
        };
        checker.submit(ItemInstanceForm { item, seller, num_of_stocks, price }, instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(stocks: &str, price: &str) -> ItemInstanceForm {
        ItemInstanceForm { item: "01ITEM".into(), seller: "01SELLER".into(), num_of_stocks: stocks.into(), price: price.into() }
    }

    #[test]
    fn stock_status_follows_count() {
        let mut instance = form("3", "10").sanitize().into_result().unwrap();
        assert_eq!(instance.stock(), IN_STOCK);
        instance.num_of_stocks = 0;
        assert_eq!(instance.stock(), OUT_OF_STOCK);
    }

    #[test]
    fn stock_outside_range_names_the_field() {
        for stocks in ["0", "101", "-1"] {
            let rejected = form(stocks, "10").sanitize().into_result().unwrap_err();
            assert_eq!(rejected.errors.len(), 1);
            assert_eq!(rejected.errors[0].field, "num_of_stocks");
        }
    }

    #[test]
    fn price_keeps_its_decimal_scale() {
        let instance = form(" 22 ", " 1600.50 ").sanitize().into_result().unwrap();
        assert_eq!(instance.num_of_stocks, 22);
        assert_eq!(instance.price.to_string(), "1600.50");
        assert!(form("1", "0.5").sanitize().into_result().is_err());
    }
}
