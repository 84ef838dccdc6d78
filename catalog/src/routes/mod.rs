//! HTTP surface: server-rendered pages under `/catalog`, uploaded images and error pages.

pub mod home;
pub mod item;
pub mod item_instance;
pub mod seller;
pub mod slot;

use crate::err::{CatalogError, ErrorPage};
use crate::model::Present;
use crate::service::Catalog;
use crate::settings::UploadSettings;
use crate::validation::FieldError;
use crate::views::{self, Views};
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Router;
use docstore::{error, info};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;
use tera::Context;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

#[derive(Clone)]
pub struct RequestState {
    pub catalog: Arc<Catalog>,
    pub views: Arc<Views>,
    pub max_image_bytes: usize,
}

impl RequestState {
    pub fn new(catalog: Arc<Catalog>, views: Arc<Views>, max_image_bytes: usize) -> Self {
        Self { catalog, views, max_image_bytes }
    }

    pub(crate) fn render(&self, name: &str, context: Context) -> Result<Response, CatalogError> {
        Ok(self.views.render(name, &context)?.into_response())
    }

    pub(crate) fn render_delete<P: Present>(&self, name: &str, title: &str, page: &P) -> Result<Response, CatalogError> {
        let mut context = views::page(title);
        context.insert("page", &page.present());
        self.render(name, context)
    }
}

/// Body of every delete confirmation form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteForm {
    pub code: String,
}

pub(crate) fn form_context<F: Serialize>(title: &str, form: &F, errors: &[FieldError]) -> Context {
    let mut context = views::page(title);
    context.insert("form", form);
    context.insert("errors", errors);
    context
}

pub(crate) fn redirect(url: &str) -> Response {
    Redirect::to(url).into_response()
}

async fn not_found() -> CatalogError {
    CatalogError::not_found("Page")
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());
    error!("Request handler panicked: {}", detail);
    CatalogError::Internal("Internal Server Error".to_string()).into_response()
}

/// Replaces error responses carrying an [`ErrorPage`] with the rendered error view.
async fn render_error_page(State(state): State<RequestState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let Some(ErrorPage { message }) = response.extensions().get::<ErrorPage>().cloned() else {
        return response;
    };
    let status = response.status();
    if status.is_server_error() {
        error!("{} {}", status, message);
    }
    let mut context = views::page("Error");
    context.insert("message", &message);
    context.insert("status", &status.as_u16());
    match state.views.render("error", &context) {
        Ok(html) => (status, html).into_response(),
        Err(e) => {
            error!("Unable to render error page: {}", e);
            response
        }
    }
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    info!("{} {} {} in {} ms", method, path, response.status().as_u16(), started.elapsed().as_millis());
    response
}

/// Catalog pages plus `extras`, all behind the panic, error-page and access-log layers.
pub fn build_router(
    state: RequestState,
    uploads: &UploadSettings,
    extras: Option<Router<RequestState>>,
    cors: Option<CorsLayer>,
) -> Router<()> {
    let public_path = format!("/{}", uploads.public_path.trim_matches('/'));
    let mut router = Router::new()
        .merge(home::routes())
        .merge(slot::routes())
        .merge(item::routes())
        .merge(seller::routes())
        .merge(item_instance::routes());
    if let Some(extra) = extras {
        router = router.merge(extra);
    }
    let router = router
        .nest_service(&public_path, ServeDir::new(&uploads.dir))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(state.clone(), render_error_page))
        .layer(middleware::from_fn(log_request))
        .with_state(state);
    if let Some(cors_layer) = cors {
        router.layer(cors_layer)
    } else {
        router
    }
}
