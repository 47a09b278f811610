//! Document endpoints: listing, upload, archive.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;

use common::{bearer, create_test_app, read_json, TestContext};
use lisadocs_core::http::security::{DocumentStatus, Role, SecurityEventType, User};

fn upload_body() -> serde_json::Value {
    json!({ "title": "Resolucion 3", "fileName": "resolucion_3.pdf" })
}

#[actix_web::test]
async fn test_secretary_uploads_in_own_workspace() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/workspaces/cam/documents")
        .insert_header(bearer(Role::SecretarioCam))
        .set_json(upload_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = read_json(resp).await;
    assert_eq!(body["createdBy"], "4");
    assert_eq!(body["workspace"], "cam");
    assert_eq!(body["status"], "stored");
    assert_eq!(ctx.documents.len(), 5);
    assert_eq!(
        ctx.events
            .get_events_by_type(&SecurityEventType::DocumentUploaded)
            .len(),
        1
    );
}

#[actix_web::test]
async fn test_upload_denied_without_grant() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/workspaces/cam/documents")
        .insert_header(bearer(Role::Intendente))
        .set_json(upload_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body = read_json(resp).await;
    assert_eq!(body["denied"]["reason"]["rule"], "permission_missing");
    assert_eq!(ctx.documents.len(), 4);
}

#[actix_web::test]
async fn test_upload_denied_in_foreign_workspace() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/workspaces/cam/documents")
        .insert_header(bearer(Role::SecretarioAmpp))
        .set_json(upload_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body = read_json(resp).await;
    assert_eq!(body["denied"]["reason"]["rule"], "restricted_to_workspace");
}

#[actix_web::test]
async fn test_anonymous_upload_requires_sign_in() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/workspaces/cam/documents")
        .set_json(upload_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_archive_then_conflict() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/workspaces/cam/documents/1/archive")
        .insert_header(bearer(Role::SecretarioCam))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(read_json(resp).await["status"], "archived");

    let req = test::TestRequest::post()
        .uri("/workspaces/cam/documents/1/archive")
        .insert_header(bearer(Role::SecretarioCam))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    assert_eq!(
        ctx.events
            .get_events_by_type(&SecurityEventType::DocumentArchived)
            .len(),
        1
    );
}

#[actix_web::test]
async fn test_archive_document_from_other_workspace() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    // Document 3 lives in ampp.
    let req = test::TestRequest::post()
        .uri("/workspaces/cam/documents/3/archive")
        .insert_header(bearer(Role::SecretarioCam))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(ctx.documents.get(3).unwrap().status, DocumentStatus::Stored);
}

#[actix_web::test]
async fn test_refreshed_profile_applies_to_next_request() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    // Profile re-fetched without the archive grant.
    assert!(ctx
        .state
        .sessions
        .refresh("secretario_cam", User::new("4", Role::SecretarioCam)));

    let req = test::TestRequest::post()
        .uri("/workspaces/cam/documents/2/archive")
        .insert_header(bearer(Role::SecretarioCam))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(ctx.documents.get(2).unwrap().status, DocumentStatus::Stored);
}

#[actix_web::test]
async fn test_listing_filters_and_pages() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri("/workspaces/cam/documents?status=stored&per_page=1")
        .insert_header(bearer(Role::SecretarioCam))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_json(resp).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["perPage"], 1);
    assert_eq!(body["documents"].as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::get()
        .uri("/workspaces/cam/documents")
        .insert_header(bearer(Role::Intendente))
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["documents"][0]["createdBy"], "7");
}
