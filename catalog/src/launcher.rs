use crate::err::CatalogError;
use crate::guard::DeleteGuard;
use crate::routes::{build_router, RequestState};
use crate::seed::{self, SeedSummary};
use crate::service::Catalog;
use crate::settings::{AppConfig, HttpSettings, UploadSettings};
use crate::upload::LocalBlobStore;
use crate::views::Views;
use docstore::{info, Storage};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower_http::cors;
use tower_http::cors::CorsLayer;

/// Opens the store and wires the catalog over it with the configured delete code and image location.
pub async fn open_catalog(config: &AppConfig) -> Result<(Arc<Storage>, Arc<Catalog>), CatalogError> {
    let (created, storage) = Storage::init(PathBuf::from(&config.store.db_path)).await?;
    if created {
        info!("Empty catalog created, run the seed command to load sample data");
    }
    let blobs = LocalBlobStore::new(PathBuf::from(&config.uploads.dir), &config.uploads.public_path)?;
    let guard = DeleteGuard::new(config.catalog.delete_code.clone());
    let catalog = Catalog::new(&storage, guard, Arc::new(blobs))?;
    Ok((storage, Arc::new(catalog)))
}

pub async fn serve(
    state: RequestState,
    http_conf: HttpSettings,
    uploads: UploadSettings,
    shutdown: watch::Receiver<bool>,
) -> Result<(), CatalogError> {
    let cors = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(cors::Any)
        .allow_headers(cors::Any);
    let router = build_router(state, &uploads, None, Some(cors));
    let tcp = TcpListener::bind(http_conf.bind_address).await?;
    info!("Starting http server at {}", http_conf.bind_address);

    let mut shutdown = shutdown.clone();
    axum::serve(tcp, router)
        .with_graceful_shutdown(async move {
            if shutdown.changed().await.is_ok() {
                info!("Shutting down server...");
            }
        })
        .await?;
    Ok(())
}

fn watch_signals(shutdown_tx: watch::Sender<bool>) -> Result<JoinHandle<()>, CatalogError> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    Ok(tokio::spawn(async move {
        tokio::select! {
            _ = sigint.recv() => info!("Received SIGINT, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
        let _ = shutdown_tx.send(true);
    }))
}

/// Serves the catalog until SIGINT or SIGTERM, then closes the store once the server has drained.
pub async fn launch(config_path: &str) -> Result<(), CatalogError> {
    let config = AppConfig::new(config_path)?;
    let (storage, catalog) = open_catalog(&config).await?;
    let views = Arc::new(Views::new()?);
    let state = RequestState::new(catalog, views, config.uploads.max_bytes);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let signals = watch_signals(shutdown_tx)?;
    let result = serve(state, config.http, config.uploads, shutdown_rx).await;
    signals.abort();
    storage.close();
    result
}

/// Loads the sample inventory into the configured store.
pub async fn seed(config_path: &str) -> Result<SeedSummary, CatalogError> {
    let config = AppConfig::new(config_path)?;
    let (storage, catalog) = open_catalog(&config).await?;
    let summary = seed::seed(&catalog).await;
    drop(catalog);
    storage.close();
    summary
}
