//! docstore keeps serde documents in [Redb](https://github.com/cberner/redb) tables, one table per collection.
//!
//! Documents are stored as JSON keyed by a generated ULID so that collections can be filtered and sorted
//! by named fields without a schema, the way a document database is queried. All blocking redb work
//! is moved to tokio's blocking pool, which lets independent reads run concurrently.

pub mod collection;
pub mod document;
pub mod error;
pub mod logger;
pub mod query;
pub mod storage;

pub use collection::Collection;
pub use document::{DocId, Document, Stored};
pub use error::AppError;
pub use query::{FilterOp, Query, SortOrder};
pub use storage::Storage;
