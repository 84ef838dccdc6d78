use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Generated identity of a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    pub fn generate() -> Self {
        DocId(Ulid::new().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocId {
    fn from(value: String) -> Self {
        DocId(value)
    }
}

impl From<&str> for DocId {
    fn from(value: &str) -> Self {
        DocId(value.to_string())
    }
}

/// A record type persisted in its own collection.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Name of the redb table backing the collection.
    const COLLECTION: &'static str;
}

/// A document together with the id it is stored under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stored<D> {
    pub id: DocId,
    #[serde(flatten)]
    pub doc: D,
}

impl<D> Stored<D> {
    pub fn new(id: DocId, doc: D) -> Self {
        Self { id, doc }
    }
}

impl<D> std::ops::Deref for Stored<D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        title: String,
    }

    #[test]
    fn generated_ids_are_unique_and_sortable() {
        let a = DocId::generate();
        let b = DocId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 26);
    }

    #[test]
    fn stored_flattens_document_next_to_id() {
        let stored = Stored::new(DocId::from("01ABC"), Note { title: "hello".into() });
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["id"], "01ABC");
        assert_eq!(json["title"], "hello");
        assert_eq!(stored.title, "hello");
    }
}
