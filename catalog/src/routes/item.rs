use crate::err::CatalogError;
use crate::guard::DeleteOutcome;
use crate::model::{Item, ItemForm, Present, Quality, Record};
use crate::routes::{form_context, redirect, DeleteForm, RequestState};
use crate::service::WriteOutcome;
use crate::upload::ImageUpload;
use crate::validation::FieldError;
use crate::views;
use axum::extract::{Multipart, Path, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Form, Router};
use docstore::DocId;

/// Multipart field carrying the optional item picture.
pub const IMAGE_FIELD: &str = "item_image";

pub fn routes() -> Router<RequestState> {
    Router::new()
        .route("/catalog/item/create", get(create_form).post(create))
        .route("/catalog/item/{id}/update", get(update_form).post(update))
        .route("/catalog/item/{id}/delete", get(delete_form).post(delete))
        .route("/catalog/item/{id}", get(detail))
        .route("/catalog/items", get(list))
}

/// Collects the text fields into an [`ItemForm`]; an empty file part means no image was chosen.
async fn read_item_form(mut multipart: Multipart, max_bytes: usize) -> Result<(ItemForm, Option<ImageUpload>), CatalogError> {
    let mut form = ItemForm::default();
    let mut image = None;
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            IMAGE_FIELD => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    image = Some(ImageUpload::accept(&file_name, &content_type, bytes, max_bytes)?);
                }
            }
            "name" => form.name = field.text().await?,
            "description" => form.description = field.text().await?,
            "quality" => form.quality = field.text().await?,
            "slot" => form.slot = field.text().await?,
            _ => {}
        }
    }
    Ok((form, image))
}

async fn item_form_view(
    state: &RequestState,
    title: &str,
    form: &ItemForm,
    errors: &[FieldError],
    img_url: Option<&str>,
) -> Result<Response, CatalogError> {
    let slots = state.catalog.slot_options().await?;
    let mut context = form_context(title, form, errors);
    context.insert("slots", &slots.present());
    context.insert("qualities", &Quality::names());
    context.insert("img_url", &img_url);
    state.render("item_form", context)
}

async fn list(State(state): State<RequestState>) -> Result<Response, CatalogError> {
    let items = state.catalog.item_list().await?;
    let mut context = views::page("Item List");
    context.insert("items", &items.present());
    state.render("item_list", context)
}

async fn detail(State(state): State<RequestState>, Path(id): Path<DocId>) -> Result<Response, CatalogError> {
    let detail = state.catalog.item_detail(&id).await?.ok_or_else(|| CatalogError::not_found("Item"))?;
    let mut context = views::page("Item Detail");
    context.insert("item", &detail.item.present());
    context.insert("instances", &detail.instances.present());
    state.render("item_detail", context)
}

async fn create_form(State(state): State<RequestState>) -> Result<Response, CatalogError> {
    item_form_view(&state, "Create Item", &ItemForm::default(), &[], None).await
}

async fn create(State(state): State<RequestState>, multipart: Multipart) -> Result<Response, CatalogError> {
    let (form, image) = read_item_form(multipart, state.max_image_bytes).await?;
    match state.catalog.create_item(form, image).await? {
        WriteOutcome::Saved(item) | WriteOutcome::Duplicate(item) => Ok(redirect(&Item::url(&item.id))),
        WriteOutcome::Rejected(rejected) => item_form_view(&state, "Create Item", &rejected.form, &rejected.errors, None).await,
        WriteOutcome::Missing => Err(CatalogError::not_found("Item")),
    }
}

async fn update_form(State(state): State<RequestState>, Path(id): Path<DocId>) -> Result<Response, CatalogError> {
    let item = state.catalog.item(&id).await?.ok_or_else(|| CatalogError::not_found("Item"))?;
    item_form_view(&state, "Update Item", &ItemForm::from(&item.doc), &[], item.img_url.as_deref()).await
}

async fn update(State(state): State<RequestState>, Path(id): Path<DocId>, multipart: Multipart) -> Result<Response, CatalogError> {
    let (form, image) = read_item_form(multipart, state.max_image_bytes).await?;
    match state.catalog.update_item(&id, form, image).await? {
        WriteOutcome::Saved(item) | WriteOutcome::Duplicate(item) => Ok(redirect(&Item::url(&item.id))),
        WriteOutcome::Rejected(rejected) => {
            let current = state.catalog.item(&id).await?.and_then(|item| item.doc.img_url);
            item_form_view(&state, "Update Item", &rejected.form, &rejected.errors, current.as_deref()).await
        }
        WriteOutcome::Missing => Err(CatalogError::not_found("Item")),
    }
}

async fn delete_form(State(state): State<RequestState>, Path(id): Path<DocId>) -> Result<Response, CatalogError> {
    match state.catalog.item_delete_page(&id).await? {
        Some(page) => state.render_delete("item_delete", "Delete Item", &page),
        None => Ok(redirect(&Item::list_url())),
    }
}

async fn delete(State(state): State<RequestState>, Path(id): Path<DocId>, Form(form): Form<DeleteForm>) -> Result<Response, CatalogError> {
    match state.catalog.delete_item(&id, &form.code).await? {
        DeleteOutcome::Deleted | DeleteOutcome::Missing => Ok(redirect(&Item::list_url())),
        DeleteOutcome::Blocked(page) => state.render_delete("item_delete", "Delete Item", &page),
    }
}
