use crate::err::CatalogError;
use crate::guard::DeleteOutcome;
use crate::model::{Present, Record, Seller, SellerForm};
use crate::routes::{form_context, redirect, DeleteForm, RequestState};
use crate::service::WriteOutcome;
use crate::views;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Form, Router};
use docstore::DocId;

pub fn routes() -> Router<RequestState> {
    Router::new()
        .route("/catalog/seller/create", get(create_form).post(create))
        .route("/catalog/seller/{id}/update", get(update_form).post(update))
        .route("/catalog/seller/{id}/delete", get(delete_form).post(delete))
        .route("/catalog/seller/{id}", get(detail))
        .route("/catalog/sellers", get(list))
}

async fn list(State(state): State<RequestState>) -> Result<Response, CatalogError> {
    let sellers = state.catalog.seller_list().await?;
    let mut context = views::page("Seller List");
    context.insert("sellers", &sellers.present());
    state.render("seller_list", context)
}

async fn detail(State(state): State<RequestState>, Path(id): Path<DocId>) -> Result<Response, CatalogError> {
    let detail = state.catalog.seller_detail(&id).await?.ok_or_else(|| CatalogError::not_found("Seller"))?;
    let mut context = views::page("Seller Detail");
    context.insert("seller", &detail.seller.present());
    context.insert("instances", &detail.instances.present());
    state.render("seller_detail", context)
}

async fn create_form(State(state): State<RequestState>) -> Result<Response, CatalogError> {
    state.render("seller_form", form_context("Create Seller", &SellerForm::default(), &[]))
}

fn write_response(state: &RequestState, title: &str, outcome: WriteOutcome<SellerForm, Seller>) -> Result<Response, CatalogError> {
    match outcome {
        WriteOutcome::Saved(seller) | WriteOutcome::Duplicate(seller) => Ok(redirect(&Seller::url(&seller.id))),
        WriteOutcome::Rejected(rejected) => state.render("seller_form", form_context(title, &rejected.form, &rejected.errors)),
        WriteOutcome::Missing => Err(CatalogError::not_found("Seller")),
    }
}

async fn create(State(state): State<RequestState>, Form(form): Form<SellerForm>) -> Result<Response, CatalogError> {
    let outcome = state.catalog.create_seller(form).await?;
    write_response(&state, "Create Seller", outcome)
}

async fn update_form(State(state): State<RequestState>, Path(id): Path<DocId>) -> Result<Response, CatalogError> {
    let seller = state.catalog.seller(&id).await?.ok_or_else(|| CatalogError::not_found("Seller"))?;
    state.render("seller_form", form_context("Update Seller", &SellerForm::from(&seller.doc), &[]))
}

async fn update(State(state): State<RequestState>, Path(id): Path<DocId>, Form(form): Form<SellerForm>) -> Result<Response, CatalogError> {
    let outcome = state.catalog.update_seller(&id, form).await?;
    write_response(&state, "Update Seller", outcome)
}

async fn delete_form(State(state): State<RequestState>, Path(id): Path<DocId>) -> Result<Response, CatalogError> {
    match state.catalog.seller_delete_page(&id).await? {
        Some(page) => state.render_delete("seller_delete", "Delete Seller", &page),
        None => Ok(redirect(&Seller::list_url())),
    }
}

async fn delete(State(state): State<RequestState>, Path(id): Path<DocId>, Form(form): Form<DeleteForm>) -> Result<Response, CatalogError> {
    match state.catalog.delete_seller(&id, &form.code).await? {
        DeleteOutcome::Deleted | DeleteOutcome::Missing => Ok(redirect(&Seller::list_url())),
        DeleteOutcome::Blocked(page) => state.render_delete("seller_delete", "Delete Seller", &page),
    }
}
