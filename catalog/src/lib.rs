//! Server-rendered inventory catalog of game items, slots, sellers and item listings,
//! stored as JSON documents in [`docstore`].

pub mod err;
pub mod guard;
pub mod launcher;
pub mod model;
pub mod populate;
pub mod routes;
pub mod seed;
pub mod service;
pub mod settings;
pub mod upload;
pub mod validation;
pub mod views;

pub use err::CatalogError;
pub use routes::{build_router, RequestState};
pub use service::Catalog;
