use crate::document::{DocId, Document, Stored};
use crate::query::Query;
use crate::AppError;
use redb::{Database, ReadableTable, TableDefinition};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::sync::Arc;

pub(crate) fn table_def<D: Document>() -> TableDefinition<'static, &'static str, &'static [u8]> {
    TableDefinition::new(D::COLLECTION)
}

fn decode<D: Document>(id: &str, bytes: &[u8]) -> Result<(Value, Stored<D>), AppError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let doc: D = serde_json::from_value(value.clone())?;
    Ok((value, Stored::new(DocId::from(id), doc)))
}

/// Typed view over one redb table of JSON documents keyed by [`DocId`].
///
/// Every operation runs on the blocking pool, so independent calls awaited together
/// with `tokio::try_join!` proceed concurrently. Writes are single-document transactions.
pub struct Collection<D: Document> {
    db: Arc<Database>,
    _doc: PhantomData<fn() -> D>,
}

impl<D: Document> Clone for Collection<D> {
    fn clone(&self) -> Self {
        Self { db: Arc::clone(&self.db), _doc: PhantomData }
    }
}

impl<D: Document> Collection<D> {
    pub(crate) fn new(db: Arc<Database>) -> Self {
        Self { db, _doc: PhantomData }
    }

    async fn run<T, F>(&self, f: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T, AppError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(&db)).await?
    }

    pub async fn insert(&self, doc: D) -> Result<Stored<D>, AppError> {
        let id = DocId::generate();
        let bytes = serde_json::to_vec(&doc)?;
        self.run(move |db| {
            let tx = db.begin_write()?;
            {
                let mut table = tx.open_table(table_def::<D>())?;
                table.insert(id.as_str(), bytes.as_slice())?;
            }
            tx.commit()?;
            Ok(Stored::new(id, doc))
        })
        .await
    }

    pub async fn get(&self, id: &DocId) -> Result<Option<Stored<D>>, AppError> {
        let id = id.clone();
        self.run(move |db| {
            let tx = db.begin_read()?;
            let table = tx.open_table(table_def::<D>())?;
            let found = match table.get(id.as_str())? {
                Some(guard) => Some(decode::<D>(id.as_str(), guard.value())?.1),
                None => None,
            };
            Ok(found)
        })
        .await
    }

    /// Looks up several ids in one read transaction; absent ids are simply missing from the map.
    pub async fn get_many(&self, ids: impl IntoIterator<Item = DocId>) -> Result<HashMap<DocId, Stored<D>>, AppError> {
        let ids: HashSet<DocId> = ids.into_iter().collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        self.run(move |db| {
            let tx = db.begin_read()?;
            let table = tx.open_table(table_def::<D>())?;
            let mut found = HashMap::with_capacity(ids.len());
            for id in ids {
                if let Some(guard) = table.get(id.as_str())? {
                    let (_, stored) = decode::<D>(id.as_str(), guard.value())?;
                    found.insert(id, stored);
                }
            }
            Ok(found)
        })
        .await
    }

    pub async fn find(&self, query: Query) -> Result<Vec<Stored<D>>, AppError> {
        self.run(move |db| {
            let tx = db.begin_read()?;
            let table = tx.open_table(table_def::<D>())?;
            let mut rows = Vec::new();
            for entry in table.iter()? {
                let (key, value) = entry?;
                let (json, stored) = decode::<D>(key.value(), value.value())?;
                if query.matches(&json) {
                    rows.push((json, stored));
                }
            }
            Ok(query.apply(rows))
        })
        .await
    }

    pub async fn find_one(&self, query: Query) -> Result<Option<Stored<D>>, AppError> {
        Ok(self.find(query.limit(1)).await?.into_iter().next())
    }

    pub async fn count(&self, query: Query) -> Result<usize, AppError> {
        self.run(move |db| {
            let tx = db.begin_read()?;
            let table = tx.open_table(table_def::<D>())?;
            let mut count = 0;
            for entry in table.iter()? {
                let (_, value) = entry?;
                let json: Value = serde_json::from_slice(value.value())?;
                if query.matches(&json) {
                    count += 1;
                }
            }
            Ok(count)
        })
        .await
    }

    /// Overwrites an existing document; returns `None` without writing when the id is unknown.
    pub async fn replace(&self, id: &DocId, doc: D) -> Result<Option<Stored<D>>, AppError> {
        let id = id.clone();
        let bytes = serde_json::to_vec(&doc)?;
        self.run(move |db| {
            let tx = db.begin_write()?;
            let existed = {
                let mut table = tx.open_table(table_def::<D>())?;
                let existed = table.get(id.as_str())?.is_some();
                if existed {
                    table.insert(id.as_str(), bytes.as_slice())?;
                }
                existed
            };
            tx.commit()?;
            Ok(existed.then(|| Stored::new(id, doc)))
        })
        .await
    }

    pub async fn remove(&self, id: &DocId) -> Result<bool, AppError> {
        let id = id.clone();
        self.run(move |db| {
            let tx = db.begin_write()?;
            let removed = {
                let mut table = tx.open_table(table_def::<D>())?;
                let removed = table.remove(id.as_str())?.is_some();
                removed
            };
            tx.commit()?;
            Ok(removed)
        })
        .await
    }
}
