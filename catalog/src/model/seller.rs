use crate::model::Record;
use crate::validation::{Checker, Form, Submission};
use docstore::Document;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    pub first_name: String,
    pub last_name: String,
}

impl Seller {
    /// "first last", or empty when either part is missing.
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.last_name.is_empty() {
            String::new()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

impl Document for Seller {
    const COLLECTION: &'static str = "sellers";
}

impl Record for Seller {
    const KIND: &'static str = "seller";

    fn derived(&self, out: &mut Map<String, Value>) {
        out.insert("name".into(), Value::String(self.name()));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SellerForm {
    pub first_name: String,
    pub last_name: String,
}

impl From<&Seller> for SellerForm {
    fn from(seller: &Seller) -> Self {
        Self { first_name: seller.first_name.clone(), last_name: seller.last_name.clone() }
    }
}

impl Form for SellerForm {
    type Target = Seller;

    fn sanitize(self) -> Submission<Self> {
        let mut checker = Checker::new();
        let first_name = checker
            .field("first_name", &self.first_name)
            .len_between(2, 100, "First name must contain between 2 and 100 characters.")
            .escape()
            .value();
        let last_name = checker
            .field("last_name", &self.last_name)
            .len_between(2, 100, "Last name must contain between 2 and 100 characters.")
            .escape()
            .value();
        let seller = Seller { first_name: first_name.clone(), last_name: last_name.clone() };
        checker.submit(SellerForm { first_name, last_name }, Some(seller))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Present;
    use docstore::{DocId, Stored};

    #[test]
    fn full_name_needs_both_parts() {
        let seller = Seller { first_name: "Axle".into(), last_name: "Goldpinch".into() };
        assert_eq!(seller.name(), "Axle Goldpinch");
        let partial = Seller { first_name: "Axle".into(), last_name: String::new() };
        assert_eq!(partial.name(), "");
    }

    #[test]
    fn presented_seller_carries_name_and_url() {
        let stored = Stored::new(DocId::from("01SELLER"), Seller { first_name: "Gar".into(), last_name: "Flamebrew".into() });
        let json = stored.present();
        assert_eq!(json["name"], "Gar Flamebrew");
        assert_eq!(json["url"], "/catalog/seller/01SELLER");
        assert_eq!(json["id"], "01SELLER");
    }

    #[test]
    fn one_letter_names_are_rejected() {
        let rejected = SellerForm { first_name: "G".into(), last_name: " F ".into() }.sanitize().into_result().unwrap_err();
        assert_eq!(rejected.errors.len(), 2);
        assert_eq!(rejected.form.last_name, "F");
    }
}
