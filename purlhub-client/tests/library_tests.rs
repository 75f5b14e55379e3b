mod common;

use common::{envelope, mock_api};
use pretty_assertions::assert_eq;
use purlhub_client::{ApiError, Asset, AssetContext, JsonMap, LibraryStore};
use serde_json::{json, Value};
use wiremock::matchers::{any, body_json, method, path, query_param};
use wiremock::{Mock, MockServer};

const WELCOME: &str = "/admin/rest/accounts/acme/library/assets/templates/email/welcome.html";

fn library(server: &MockServer) -> LibraryStore {
    mock_api(server).accounts().library("acme").unwrap()
}

fn welcome() -> Value {
    json!({
        "filename": "email/welcome.html",
        "contentType": "text/html",
        "metadata": {"context": "templates", "author": "ops"},
        "head": true,
        "length": 512
    })
}

fn options(value: Value) -> JsonMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

#[tokio::test]
async fn get_asset_unwraps_item_and_sends_options() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WELCOME))
        .and(query_param("version", "3"))
        .respond_with(envelope(json!({"item": welcome()})))
        .expect(1)
        .mount(&server)
        .await;

    let asset = library(&server)
        .get("template", "/email/welcome.html", Some(&options(json!({"version": 3}))))
        .await
        .unwrap();

    assert_eq!(asset.id(), Some("email/welcome.html"));
    assert_eq!(asset.context().unwrap(), AssetContext::Templates);
    assert_eq!(asset.length, Some(512));
}

#[tokio::test]
async fn get_asset_without_item_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WELCOME))
        .respond_with(envelope(json!({})))
        .mount(&server)
        .await;

    let err = library(&server)
        .get("templates", "email/welcome.html", None)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn list_assets_below_a_directory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/rest/accounts/acme/library/assets/templates/email/"))
        .respond_with(envelope(json!({"list": [welcome()]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/rest/accounts/acme/library/assets/images/"))
        .respond_with(envelope(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let store = library(&server);
    let templates = store.list("templates", Some("/email/"), None).await.unwrap();
    let images = store.list("image", None, None).await.unwrap();

    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].filename, "email/welcome.html");
    assert!(images.is_empty());
}

#[tokio::test]
async fn invalid_context_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(envelope(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let err = library(&server)
        .get("music", "song.mp3", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(ref m) if m.contains("context")));
}

#[tokio::test]
async fn save_posts_content_and_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(WELCOME))
        .and(body_json(json!({
            "contentType": "text/html",
            "utf8Content": "<p>Hi</p>",
            "description": "Welcome mail",
            "tags": ["onboarding"],
            "extraData": {"owner": "ops"},
            "publish": true
        })))
        .respond_with(envelope(json!({"item": welcome()})))
        .expect(1)
        .mount(&server)
        .await;

    let mut asset = Asset::new("email/welcome.html", AssetContext::Templates, "text/html");
    asset.utf8_content = Some("<p>Hi</p>".to_string());
    asset.metadata.description = Some("Welcome mail".to_string());
    asset.metadata.tags = Some(json!(["onboarding"]));
    asset.extra = Some(json!({"owner": "ops"}));

    let saved = library(&server)
        .save(
            "templates",
            "email/welcome.html",
            &asset,
            Some(&options(json!({"publish": true}))),
        )
        .await
        .unwrap();
    assert_eq!(saved.id(), Some("email/welcome.html"));
}

#[tokio::test]
async fn bound_rename_posts_rename_to() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WELCOME))
        .respond_with(envelope(json!({"item": welcome()})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(WELCOME))
        .and(body_json(json!({
            "contentType": "text/html",
            "author": "ops",
            "renameTo": "email/hello.html"
        })))
        .respond_with(envelope(json!({"item": {
            "filename": "email/hello.html",
            "contentType": "text/html",
            "metadata": {"context": "templates"}
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let store = library(&server);
    let mut asset = store.bind(
        store
            .get("templates", "email/welcome.html", None)
            .await
            .unwrap(),
    );
    asset.filename = "email/hello.html".to_string();
    asset.save().await.unwrap();

    assert_eq!(asset.id(), Some("email/hello.html"));
}

#[tokio::test]
async fn save_requires_content_type_and_context() {
    let server = MockServer::start().await;
    let store = library(&server);

    let mut asset = Asset::new("a.txt", AssetContext::Documents, "text/plain");
    asset.content_type = None;
    assert!(matches!(
        store.save("documents", "a.txt", &asset, None).await.unwrap_err(),
        ApiError::InvalidArgument(_)
    ));

    let mut asset = Asset::new("a.txt", AssetContext::Documents, "text/plain");
    asset.metadata.context = None;
    assert!(matches!(
        store.save("documents", "a.txt", &asset, None).await.unwrap_err(),
        ApiError::InvalidArgument(_)
    ));

    let asset = Asset::new("", AssetContext::Documents, "text/plain");
    assert!(store.save("documents", "a.txt", &asset, None).await.is_err());
}

#[tokio::test]
async fn remove_returns_the_removed_item() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(WELCOME))
        .respond_with(envelope(json!({"item": welcome()})))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = library(&server)
        .remove("templates", "email/welcome.html", None)
        .await
        .unwrap();
    assert_eq!(snapshot["filename"], "email/welcome.html");
}
