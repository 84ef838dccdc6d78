//! Catalog records and the forms that create them.

pub mod item;
pub mod item_instance;
pub mod seller;
pub mod slot;

pub use item::{Item, ItemForm, Quality};
pub use item_instance::{ItemInstance, ItemInstanceForm};
pub use seller::{Seller, SellerForm};
pub use slot::{Slot, SlotForm};

use docstore::{DocId, Document, Stored};
use serde_json::{Map, Value};

/// A document that is addressable under `/catalog/<KIND>/<id>`.
pub trait Record: Document {
    const KIND: &'static str;

    fn url(id: &DocId) -> String {
        format!("/catalog/{}/{}", Self::KIND, id)
    }

    fn list_url() -> String {
        format!("/catalog/{}s", Self::KIND)
    }

    /// Virtual fields computed from the stored ones.
    fn derived(&self, _out: &mut Map<String, Value>) {}
}

/// JSON shape handed to templates: stored fields, `id`, `url` and derived fields.
pub trait Present {
    fn present(&self) -> Value;
}

impl<D: Record> Present for Stored<D> {
    fn present(&self) -> Value {
        let mut out = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        out.insert("url".into(), Value::String(D::url(&self.id)));
        self.doc.derived(&mut out);
        Value::Object(out)
    }
}

impl<T: Present> Present for Option<T> {
    fn present(&self) -> Value {
        self.as_ref().map(Present::present).unwrap_or(Value::Null)
    }
}

impl<T: Present> Present for Vec<T> {
    fn present(&self) -> Value {
        Value::Array(self.iter().map(Present::present).collect())
    }
}
