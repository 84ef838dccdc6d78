use crate::err::CatalogError;
use crate::guard::DeleteOutcome;
use crate::model::{ItemInstance, ItemInstanceForm, Present, Record};
use crate::routes::{form_context, redirect, DeleteForm, RequestState};
use crate::service::WriteOutcome;
use crate::validation::FieldError;
use crate::views;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Form, Router};
use docstore::DocId;

pub fn routes() -> Router<RequestState> {
    Router::new()
        .route("/catalog/iteminstance/create", get(create_form).post(create))
        .route("/catalog/iteminstance/{id}/update", get(update_form).post(update))
        .route("/catalog/iteminstance/{id}/delete", get(delete_form).post(delete))
        .route("/catalog/iteminstance/{id}", get(detail))
        .route("/catalog/iteminstances", get(list))
}

async fn instance_form_view(state: &RequestState, title: &str, form: &ItemInstanceForm, errors: &[FieldError]) -> Result<Response, CatalogError> {
    let options = state.catalog.instance_form_options().await?;
    let mut context = form_context(title, form, errors);
    context.insert("items", &options.items.present());
    context.insert("sellers", &options.sellers.present());
    state.render("iteminstance_form", context)
}

async fn write_response(state: &RequestState, title: &str, outcome: WriteOutcome<ItemInstanceForm, ItemInstance>) -> Result<Response, CatalogError> {
    match outcome {
        WriteOutcome::Saved(instance) | WriteOutcome::Duplicate(instance) => Ok(redirect(&ItemInstance::url(&instance.id))),
        WriteOutcome::Rejected(rejected) => instance_form_view(state, title, &rejected.form, &rejected.errors).await,
        WriteOutcome::Missing => Err(CatalogError::not_found("Item instance")),
    }
}

async fn list(State(state): State<RequestState>) -> Result<Response, CatalogError> {
    let instances = state.catalog.instance_list().await?;
    let mut context = views::page("Item Instance List");
    context.insert("instances", &instances.present());
    state.render("iteminstance_list", context)
}

async fn detail(State(state): State<RequestState>, Path(id): Path<DocId>) -> Result<Response, CatalogError> {
    let instance = state.catalog.instance_detail(&id).await?.ok_or_else(|| CatalogError::not_found("Item instance"))?;
    let mut context = views::page("Item Instance Detail");
    context.insert("instance", &instance.present());
    state.render("iteminstance_detail", context)
}

async fn create_form(State(state): State<RequestState>) -> Result<Response, CatalogError> {
    instance_form_view(&state, "Create Item Instance", &ItemInstanceForm::default(), &[]).await
}

async fn create(State(state): State<RequestState>, Form(form): Form<ItemInstanceForm>) -> Result<Response, CatalogError> {
    let outcome = state.catalog.create_instance(form).await?;
    write_response(&state, "Create Item Instance", outcome).await
}

async fn update_form(State(state): State<RequestState>, Path(id): Path<DocId>) -> Result<Response, CatalogError> {
    let instance = state.catalog.instance(&id).await?.ok_or_else(|| CatalogError::not_found("Item instance"))?;
    instance_form_view(&state, "Update Item Instance", &ItemInstanceForm::from(&instance.doc), &[]).await
}

async fn update(State(state): State<RequestState>, Path(id): Path<DocId>, Form(form): Form<ItemInstanceForm>) -> Result<Response, CatalogError> {
    let outcome = state.catalog.update_instance(&id, form).await?;
    write_response(&state, "Update Item Instance", outcome).await
}

async fn delete_form(State(state): State<RequestState>, Path(id): Path<DocId>) -> Result<Response, CatalogError> {
    match state.catalog.instance_delete_page(&id).await? {
        Some(page) => state.render_delete("iteminstance_delete", "Delete Item Instance", &page),
        None => Ok(redirect(&ItemInstance::list_url())),
    }
}

async fn delete(State(state): State<RequestState>, Path(id): Path<DocId>, Form(form): Form<DeleteForm>) -> Result<Response, CatalogError> {
    match state.catalog.delete_instance(&id, &form.code).await? {
        DeleteOutcome::Deleted | DeleteOutcome::Missing => Ok(redirect(&ItemInstance::list_url())),
        DeleteOutcome::Blocked(page) => state.render_delete("iteminstance_delete", "Delete Item Instance", &page),
    }
}
