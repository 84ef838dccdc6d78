use crate::collection::Collection;
use crate::document::Document;
use crate::{error, info, AppError};
use redb::Database;
use std::path::PathBuf;
use std::sync::Arc;
use std::{env, fs};

const DB_FILE: &str = "documents.db";

/// Process-wide handle to the document database, constructed once at startup and shared by reference.
pub struct Storage {
    pub db: Arc<Database>,
}

impl Storage {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Opens the database under `db_dir`, creating it when missing. The flag tells whether it was created.
    pub async fn init(db_dir: PathBuf) -> Result<(bool, Arc<Storage>), AppError> {
        let db_path = db_dir.join(DB_FILE);
        if !db_path.exists() {
            fs::create_dir_all(&db_dir)?;
            info!("Creating new db at {:?}", db_path);
            let db = Database::create(db_path)?;
            Ok((true, Arc::new(Storage::new(Arc::new(db)))))
        } else {
            info!("Opening existing db at {:?}, it might take a while in case previous process was killed", db_path);
            let db = tokio::task::spawn_blocking(move || Database::open(db_path)).await??;
            Ok((false, Arc::new(Storage::new(Arc::new(db)))))
        }
    }

    pub async fn temp(name: &str, random: bool) -> Result<Arc<Storage>, AppError> {
        let db_name = if random {
            format!("{}_{}", name, rand::random::<u64>())
        } else {
            name.to_string()
        };
        let db_dir = env::temp_dir().join("docstore").join(db_name);
        if random && db_dir.exists() {
            fs::remove_dir_all(&db_dir)?;
        }
        let (_, storage) = Storage::init(db_dir).await?;
        Ok(storage)
    }

    /// Opens the collection of `D`, creating its table on first use so readers never miss it.
    pub fn collection<D: Document>(&self) -> Result<Collection<D>, AppError> {
        let tx = self.db.begin_write()?;
        tx.open_table(crate::collection::table_def::<D>())?;
        tx.commit()?;
        Ok(Collection::new(Arc::clone(&self.db)))
    }

    /// Releases the handle at shutdown, reporting collections that still hold the database open.
    pub fn close(self: Arc<Self>) {
        match Arc::try_unwrap(self) {
            Ok(storage) => {
                let sc = Arc::strong_count(&storage.db);
                if sc != 1 {
                    error!("Database still has {sc} strong refs at shutdown");
                } else {
                    info!("Database closed");
                }
            }
            Err(shared) => {
                error!("Storage still has {} strong refs at shutdown", Arc::strong_count(&shared));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        title: String,
    }

    impl Document for Note {
        const COLLECTION: &'static str = "notes";
    }

    #[tokio::test]
    async fn init_reports_creation_then_reopens_existing() {
        let dir = env::temp_dir().join("docstore").join(format!("init_{}", rand::random::<u64>()));
        let (created, storage) = Storage::init(dir.clone()).await.unwrap();
        assert!(created);
        let notes = storage.collection::<Note>().unwrap();
        let stored = notes.insert(Note { title: "kept".into() }).await.unwrap();
        drop(notes);
        storage.close();

        let (created, storage) = Storage::init(dir).await.unwrap();
        assert!(!created);
        let notes = storage.collection::<Note>().unwrap();
        assert_eq!(notes.get(&stored.id).await.unwrap(), Some(stored));
    }
}
