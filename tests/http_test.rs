use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use axum::routing::get;
use axum::Router;
use catalog::err::CatalogError;
use catalog::guard::DeleteGuard;
use catalog::model::{Quality, SlotForm};
use catalog::routes::item::IMAGE_FIELD;
use catalog::routes::{build_router, RequestState};
use catalog::service::{Catalog, WriteOutcome};
use catalog::settings::UploadSettings;
use catalog::upload::LocalBlobStore;
use catalog::views::Views;
use docstore::{DocId, Storage};
use std::path::PathBuf;
use std::sync::Arc;

const MAX_IMAGE_BYTES: usize = 200_000;

async fn test_server(name: &str) -> (TestServer, Arc<Catalog>) {
    test_server_with(name, None).await
}

async fn test_server_with(name: &str, extras: Option<Router<RequestState>>) -> (TestServer, Arc<Catalog>) {
    let storage = Storage::temp(name, true).await.unwrap();
    let upload_dir: PathBuf = std::env::temp_dir().join("catalog").join(format!("{}_{}_http", name, rand::random::<u64>()));
    let blobs = LocalBlobStore::new(upload_dir.clone(), "/uploads").unwrap();
    let catalog = Arc::new(Catalog::new(&storage, DeleteGuard::new("123"), Arc::new(blobs)).unwrap());
    let uploads = UploadSettings {
        dir: upload_dir.to_string_lossy().into_owned(),
        public_path: "/uploads".to_string(),
        max_bytes: MAX_IMAGE_BYTES,
    };
    let state = RequestState::new(Arc::clone(&catalog), Arc::new(Views::new().unwrap()), MAX_IMAGE_BYTES);
    let server = TestServer::new(build_router(state, &uploads, extras, None)).unwrap();
    (server, catalog)
}

fn location(response: &TestResponse) -> String {
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    response.header("location").to_str().unwrap().to_string()
}

async fn head_slot(catalog: &Catalog) -> DocId {
    let form = SlotForm { name: "Head".into(), description: "Head armor slot".into() };
    match catalog.create_slot(form).await.unwrap() {
        WriteOutcome::Saved(slot) => slot.id,
        other => panic!("expected a saved slot, got {:?}", other),
    }
}

fn item_multipart(name: &str, slot: &DocId) -> MultipartForm {
    MultipartForm::new()
        .add_text("name", name.to_string())
        .add_text("description", "Plate helm of the valiant")
        .add_text("quality", Quality::Rare.to_string())
        .add_text("slot", slot.to_string())
}

#[tokio::test]
async fn root_redirects_to_dashboard() {
    let (server, _) = test_server("http_root").await;
    assert_eq!(location(&server.get("/").await), "/catalog");

    let dashboard = server.get("/catalog").await;
    dashboard.assert_status_ok();
    assert!(dashboard.text().contains("<strong>Slots:</strong> 0"));
}

#[tokio::test]
async fn unknown_pages_and_records_render_not_found() {
    let (server, _) = test_server("http_not_found").await;

    let unknown = server.get("/catalog/nothing/here").await;
    unknown.assert_status(StatusCode::NOT_FOUND);
    assert!(unknown.text().contains("Page not found"));

    for path in ["/catalog/slot/missing", "/catalog/item/missing/update", "/catalog/seller/missing", "/catalog/iteminstance/missing"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("<title>Error</title>"), "{} did not render the error page", path);
    }

    assert_eq!(location(&server.get("/catalog/slot/missing/delete").await), "/catalog/slots");
    assert_eq!(location(&server.post("/catalog/seller/missing/delete").form(&[("code", "123")]).await), "/catalog/sellers");
}

#[tokio::test]
async fn slot_forms_create_redirect_and_reject() {
    let (server, _) = test_server("http_slot").await;

    let created = server.post("/catalog/slot/create").form(&[("name", "Head"), ("description", "Head armor slot")]).await;
    let url = location(&created);
    assert!(url.starts_with("/catalog/slot/"));

    let duplicate = server.post("/catalog/slot/create").form(&[("name", "head"), ("description", "Another head slot")]).await;
    assert_eq!(location(&duplicate), url);

    let detail = server.get(&url).await;
    detail.assert_status_ok();
    assert!(detail.text().contains("Slot: Head"));

    let rejected = server.post("/catalog/slot/create").form(&[("name", "ab"), ("description", "<x>")]).await;
    rejected.assert_status_ok();
    let html = rejected.text();
    assert!(html.contains("Slot name must contain between 3 and 100 characters."));
    assert!(html.contains("value=\"&lt;x&gt;\""));

    let list = server.get("/catalog/slots").await;
    assert_eq!(list.text().matches(">Head</a>").count(), 1);
}

#[tokio::test]
async fn item_upload_limits_are_enforced() {
    let (server, catalog) = test_server("http_upload").await;
    let slot = head_slot(&catalog).await;

    let text = item_multipart("Helm of Valor", &slot).add_part("item_image", Part::bytes(b"hello".to_vec()).file_name("notes.txt").mime_type("text/plain"));
    server.post("/catalog/item/create").multipart(text).await.assert_status(StatusCode::BAD_REQUEST);

    let oversized = vec![0u8; MAX_IMAGE_BYTES + 1];
    let big = item_multipart("Helm of Valor", &slot).add_part("item_image", Part::bytes(oversized).file_name("helm.png").mime_type("image/png"));
    server.post("/catalog/item/create").multipart(big).await.assert_status(StatusCode::BAD_REQUEST);
    assert!(catalog.item_list().await.unwrap().is_empty());

    let image = b"\x89PNG fake image".to_vec();
    let ok = item_multipart("Helm of Valor", &slot).add_part("item_image", Part::bytes(image.clone()).file_name("helm.png").mime_type("image/png"));
    let url = location(&server.post("/catalog/item/create").multipart(ok).await);

    let id = DocId::from(url.rsplit('/').next().unwrap());
    let item = catalog.item(&id).await.unwrap().unwrap();
    let img_url = item.img_url.clone().unwrap();
    let served = server.get(&img_url).await;
    served.assert_status_ok();
    assert_eq!(served.as_bytes().to_vec(), image);

    let detail = server.get(&url).await;
    assert!(detail.text().contains(&format!("src=\"{}\"", img_url)));
}

#[tokio::test]
async fn uploads_are_stored_under_their_image_type() {
    let (server, catalog) = test_server("http_upload_type").await;
    let slot = head_slot(&catalog).await;

    let svg = b"<svg xmlns=\"http://www.w3.org/2000/svg\"><script>alert(1)</script></svg>".to_vec();
    let vector = item_multipart("Helm of Valor", &slot).add_part("item_image", Part::bytes(svg).file_name("helm.svg").mime_type("image/svg+xml"));
    server.post("/catalog/item/create").multipart(vector).await.assert_status(StatusCode::BAD_REQUEST);
    assert!(catalog.item_list().await.unwrap().is_empty());

    let script = b"<script>alert(document.cookie)</script>".to_vec();
    let disguised = item_multipart("Helm of Valor", &slot).add_part("item_image", Part::bytes(script).file_name("pwn.html").mime_type("image/png"));
    let url = location(&server.post("/catalog/item/create").multipart(disguised).await);

    let id = DocId::from(url.rsplit('/').next().unwrap());
    let img_url = catalog.item(&id).await.unwrap().unwrap().img_url.clone().unwrap();
    assert!(img_url.ends_with(".png"), "stored as {}", img_url);
    let served = server.get(&img_url).await;
    served.assert_status_ok();
    let content_type = served.header("content-type").to_str().unwrap().to_string();
    assert!(!content_type.contains("html"), "served as {}", content_type);
}

#[tokio::test]
async fn item_update_from_multipart_keeps_current_image() {
    let (server, catalog) = test_server("http_item_update").await;
    let slot = head_slot(&catalog).await;
    let image = item_multipart("Helm of Valor", &slot).add_part("item_image", Part::bytes(b"\x89PNG helm".to_vec()).file_name("helm.png").mime_type("image/png"));
    let url = location(&server.post("/catalog/item/create").multipart(image).await);
    let id = DocId::from(url.rsplit('/').next().unwrap());
    let img_url = catalog.item(&id).await.unwrap().unwrap().img_url.clone();

    let form = server.get(&format!("{}/update", url)).await;
    form.assert_status_ok();
    assert!(form.text().contains("value=\"Helm of Valor\""));
    assert!(form.text().contains(&format!("name=\"{}\"", IMAGE_FIELD)));

    let changed = MultipartForm::new()
        .add_text("name", "Helm of Valor")
        .add_text("description", "Plate helm of the valiant")
        .add_text("quality", Quality::Legendary.to_string())
        .add_text("slot", slot.to_string())
        .add_part("item_image", Part::bytes(Vec::new()).file_name("").mime_type("application/octet-stream"));
    assert_eq!(location(&server.post(&format!("{}/update", url)).multipart(changed).await), url);

    let item = catalog.item(&id).await.unwrap().unwrap();
    assert_eq!(item.quality, Quality::Legendary);
    assert_eq!(item.img_url, img_url);

    let rejected = server.post(&format!("{}/update", url)).multipart(item_multipart("", &slot)).await;
    rejected.assert_status_ok();
    assert!(rejected.text().contains("class=\"errors\""));
    assert_eq!(catalog.item(&id).await.unwrap().unwrap().name, "Helm of Valor");

    let missing = server.post("/catalog/item/missing/update").multipart(item_multipart("Helm of Valor", &slot)).await;
    missing.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn item_without_image_is_created_from_multipart() {
    let (server, catalog) = test_server("http_item").await;
    let slot = head_slot(&catalog).await;

    let form = item_multipart("Helm of Valor", &slot).add_part("item_image", Part::bytes(Vec::new()).file_name("").mime_type("application/octet-stream"));
    let url = location(&server.post("/catalog/item/create").multipart(form).await);
    let id = DocId::from(url.rsplit('/').next().unwrap());
    assert_eq!(catalog.item(&id).await.unwrap().unwrap().img_url, None);

    let listed = server.get("/catalog/items").await;
    assert!(listed.text().contains("Helm of Valor"));
    assert!(listed.text().contains(">Head</a>"));
}

#[tokio::test]
async fn delete_workflow_honours_dependents_and_code() {
    let (server, catalog) = test_server("http_delete").await;
    let slot = head_slot(&catalog).await;
    let item_url = location(&server.post("/catalog/item/create").multipart(item_multipart("Helm of Valor", &slot)).await);
    let slot_url = format!("/catalog/slot/{}", slot);

    let confirm = server.get(&format!("{}/delete", slot_url)).await;
    confirm.assert_status_ok();
    assert!(confirm.text().contains("Delete the following items"));

    let blocked = server.post(&format!("{}/delete", slot_url)).form(&[("code", "123")]).await;
    blocked.assert_status_ok();
    assert!(blocked.text().contains("Helm of Valor"));

    let wrong = server.post(&format!("{}/delete", item_url)).form(&[("code", "999")]).await;
    wrong.assert_status_ok();
    assert!(wrong.text().contains("Incorrect confirmation code."));

    assert_eq!(location(&server.post(&format!("{}/delete", item_url)).form(&[("code", "123")]).await), "/catalog/items");
    assert_eq!(location(&server.post(&format!("{}/delete", slot_url)).form(&[("code", "123")]).await), "/catalog/slots");
    server.get(&slot_url).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_forms_validate_stock() {
    let (server, catalog) = test_server("http_listing").await;
    let slot = head_slot(&catalog).await;
    let item_url = location(&server.post("/catalog/item/create").multipart(item_multipart("Helm of Valor", &slot)).await);
    let seller_url = location(&server.post("/catalog/seller/create").form(&[("first_name", "Gar"), ("last_name", "Flamebrew")]).await);
    let item = item_url.rsplit('/').next().unwrap();
    let seller = seller_url.rsplit('/').next().unwrap();

    let rejected = server
        .post("/catalog/iteminstance/create")
        .form(&[("item", item), ("seller", seller), ("num_of_stocks", "0"), ("price", "12.00")])
        .await;
    rejected.assert_status_ok();
    assert!(rejected.text().contains("class=\"errors\""));

    let created = server
        .post("/catalog/iteminstance/create")
        .form(&[("item", item), ("seller", seller), ("num_of_stocks", "7"), ("price", "12.00")])
        .await;
    let url = location(&created);
    let detail = server.get(&url).await;
    detail.assert_status_ok();
    assert!(detail.text().contains("In-stock"));
    assert!(detail.text().contains("Gar Flamebrew"));

    let seller_page = server.get(&seller_url).await;
    assert!(seller_page.text().contains("Helm of Valor"));
}

#[tokio::test]
async fn listing_form_offers_items_and_sellers() {
    let (server, catalog) = test_server("http_listing_form").await;
    let slot = head_slot(&catalog).await;
    server.post("/catalog/item/create").multipart(item_multipart("Helm of Valor", &slot)).await;
    server.post("/catalog/seller/create").form(&[("first_name", "Gar"), ("last_name", "Flamebrew")]).await;

    let form = server.get("/catalog/iteminstance/create").await;
    form.assert_status_ok();
    let html = form.text();
    assert!(html.contains(">Helm of Valor</option>"));
    assert!(html.contains(">Gar Flamebrew</option>"));
}

async fn failing_handler() -> Result<String, CatalogError> {
    Err(CatalogError::Internal("store unavailable".to_string()))
}

async fn panicking_handler() -> String {
    panic!("handler blew up")
}

#[tokio::test]
async fn server_errors_render_the_error_page() {
    let extras = Router::new().route("/catalog/failing", get(failing_handler)).route("/catalog/panicking", get(panicking_handler));
    let (server, _) = test_server_with("http_server_error", Some(extras)).await;

    for path in ["/catalog/failing", "/catalog/panicking"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let html = response.text();
        assert!(html.contains("<title>Error</title>"), "{} did not render the error page", path);
        assert!(html.contains("<h2>500</h2>"));
    }
}
