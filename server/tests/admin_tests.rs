//! User administration and session endpoints.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;

use common::{bearer, create_test_app, read_json, TestContext};
use lisadocs_core::http::security::Role;

#[actix_web::test]
async fn test_admin_options_for_administrador() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri("/admin/options")
        .insert_header(bearer(Role::Administrador))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_json(resp).await;
    assert_eq!(body["roles"].as_array().map(Vec::len), Some(8));
    assert_eq!(body["workspaces"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["roles"][0]["value"], "administrador");
}

#[actix_web::test]
async fn test_admin_options_denied_for_others() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri("/admin/options")
        .insert_header(bearer(Role::Presidente))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get().uri("/admin/options").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_profile() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri("/auth/profile")
        .insert_header(bearer(Role::SecretarioCam))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_json(resp).await;
    assert_eq!(body["user"]["role"], "secretario_cam");
    assert_eq!(body["user"]["id"], "4");
    assert_eq!(body["workspaces"], serde_json::json!(["cam"]));

    let req = test::TestRequest::get().uri("/auth/profile").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_json(resp).await["error"], "authentication required");
}

#[actix_web::test]
async fn test_unknown_token_is_anonymous() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri("/workspaces/cam")
        .insert_header(("Authorization", "Bearer nobody"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_logout_closes_session() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/auth/logout")
        .insert_header(bearer(Role::Intendente))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/auth/profile")
        .insert_header(bearer(Role::Intendente))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/auth/logout")
        .insert_header(bearer(Role::Intendente))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
