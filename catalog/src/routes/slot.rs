use crate::err::CatalogError;
use crate::guard::DeleteOutcome;
use crate::model::{Present, Record, Slot, SlotForm};
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
        .route("/catalog/slot/create", get(create_form).post(create))
        .route("/catalog/slot/{id}/update", get(update_form).post(update))
        .route("/catalog/slot/{id}/delete", get(delete_form).post(delete))
        .route("/catalog/slot/{id}", get(detail))
        .route("/catalog/slots", get(list))
}

async fn list(State(state): State<RequestState>) -> Result<Response, CatalogError> {
    let slots = state.catalog.slot_list().await?;
    let mut context = views::page("Slot List");
    context.insert("slots", &slots.present());
    state.render("slot_list", context)
}

async fn detail(State(state): State<RequestState>, Path(id): Path<DocId>) -> Result<Response, CatalogError> {
    let detail = state.catalog.slot_detail(&id).await?.ok_or_else(|| CatalogError::not_found("Slot"))?;
    let mut context = views::page("Slot Detail");
    context.insert("slot", &detail.slot.present());
    context.insert("items", &detail.items.present());
    state.render("slot_detail", context)
}

async fn create_form(State(state): State<RequestState>) -> Result<Response, CatalogError> {
    state.render("slot_form", form_context("Create Slot", &SlotForm::default(), &[]))
}

fn write_response(state: &RequestState, title: &str, outcome: WriteOutcome<SlotForm, Slot>) -> Result<Response, CatalogError> {
    match outcome {
        WriteOutcome::Saved(slot) | WriteOutcome::Duplicate(slot) => Ok(redirect(&Slot::url(&slot.id))),
        WriteOutcome::Rejected(rejected) => state.render("slot_form", form_context(title, &rejected.form, &rejected.errors)),
        WriteOutcome::Missing => Err(CatalogError::not_found("Slot")),
    }
}

async fn create(State(state): State<RequestState>, Form(form): Form<SlotForm>) -> Result<Response, CatalogError> {
    let outcome = state.catalog.create_slot(form).await?;
    write_response(&state, "Create Slot", outcome)
}

async fn update_form(State(state): State<RequestState>, Path(id): Path<DocId>) -> Result<Response, CatalogError> {
    let slot = state.catalog.slot(&id).await?.ok_or_else(|| CatalogError::not_found("Slot"))?;
    state.render("slot_form", form_context("Update Slot", &SlotForm::from(&slot.doc), &[]))
}

async fn update(State(state): State<RequestState>, Path(id): Path<DocId>, Form(form): Form<SlotForm>) -> Result<Response, CatalogError> {
    let outcome = state.catalog.update_slot(&id, form).await?;
    write_response(&state, "Update Slot", outcome)
}

async fn delete_form(State(state): State<RequestState>, Path(id): Path<DocId>) -> Result<Response, CatalogError> {
    match state.catalog.slot_delete_page(&id).await? {
        Some(page) => state.render_delete("slot_delete", "Delete Slot", &page),
        None => Ok(redirect(&Slot::list_url())),
    }
}

async fn delete(State(state): State<RequestState>, Path(id): Path<DocId>, Form(form): Form<DeleteForm>) -> Result<Response, CatalogError> {
    match state.catalog.delete_slot(&id, &form.code).await? {
        DeleteOutcome::Deleted | DeleteOutcome::Missing => Ok(redirect(&Slot::list_url())),
        DeleteOutcome::Blocked(page) => state.render_delete("slot_delete", "Delete Slot", &page),
    }
}
