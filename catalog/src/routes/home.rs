use crate::err::CatalogError;
use crate::routes::{redirect, RequestState};
use crate::views;
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;

pub fn routes() -> Router<RequestState> {
    Router::new()
        .route("/", get(root))
        .route("/catalog", get(index))
}

async fn root() -> Response {
    redirect("/catalog")
}

async fn index(State(state): State<RequestState>) -> Result<Response, CatalogError> {
    let dashboard = state.catalog.dashboard().await?;
    let mut context = views::page("Inventory Home");
    context.insert("dashboard", &dashboard);
    state.render("index", context)
}
