//! Workspace navigation through the security middleware.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;

use common::{bearer, create_test_app, read_json, TestContext};
use lisadocs_core::http::security::{Role, SecurityEventType};

#[actix_web::test]
async fn test_anonymous_gets_sign_in_panel() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get().uri("/workspaces/cam").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body = read_json(resp).await;
    assert_eq!(body["denied"]["kind"], "unauthenticated");
    assert_eq!(body["denied"]["available"], json!([]));
    assert_eq!(
        ctx.events
            .get_events_by_type(&SecurityEventType::AuthenticationRequired)
            .len(),
        1
    );
}

#[actix_web::test]
async fn test_unknown_workspace_not_recognized() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri("/workspaces/unknown_ws")
        .insert_header(bearer(Role::CfMember))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = read_json(resp).await;
    assert_eq!(body["denied"]["kind"], "not_recognized");
    assert_eq!(body["denied"]["role"], "cf_member");
    assert_eq!(body["denied"]["available"], json!(["comisiones_cf"]));
    assert!(body["denied"]["message"]
        .as_str()
        .unwrap()
        .contains("unknown_ws"));
}

#[actix_web::test]
async fn test_restricted_role_denied_foreign_workspace() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    // Holds a view grant on cam, but the role is limited to ampp.
    let req = test::TestRequest::get()
        .uri("/workspaces/cam")
        .insert_header(bearer(Role::SecretarioAmpp))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body = read_json(resp).await;
    assert_eq!(body["denied"]["kind"], "permission_denied");
    assert_eq!(body["denied"]["reason"]["rule"], "restricted_to_workspace");
    assert_eq!(body["denied"]["reason"]["workspace"], "ampp");
    assert_eq!(body["denied"]["available"], json!(["ampp"]));

    let denied = ctx
        .events
        .get_events_by_type(&SecurityEventType::AccessDenied);
    assert_eq!(denied.len(), 1);
    assert_eq!(denied[0].user_id.as_deref(), Some("5"));
}

#[actix_web::test]
async fn test_member_dashboard_scoped_to_own_documents() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri("/workspaces/cam")
        .insert_header(bearer(Role::Intendente))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_json(resp).await;
    assert_eq!(body["workspace"], "cam");
    assert_eq!(
        body["controls"],
        json!({ "canView": true, "canUpload": false, "canArchive": false, "canManage": false })
    );
    assert_eq!(body["scope"], json!({ "scope": "created_by", "userId": "7" }));
    assert_eq!(body["total"], 1);
    assert_eq!(body["documents"][0]["title"], "Informe intendente");
}

#[actix_web::test]
async fn test_secretary_dashboard_sees_all() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri("/workspaces/cam")
        .insert_header(bearer(Role::SecretarioCam))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_json(resp).await;
    assert_eq!(body["scope"], json!({ "scope": "all" }));
    assert_eq!(body["total"], 2);
    assert_eq!(
        body["controls"],
        json!({ "canView": true, "canUpload": true, "canArchive": true, "canManage": true })
    );
    assert_eq!(body["documents"][0]["actions"]["canArchive"], true);
}

#[actix_web::test]
async fn test_alias_segment_and_archived_rows() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri("/workspaces/comisiones")
        .insert_header(bearer(Role::Presidente))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_json(resp).await;
    assert_eq!(body["workspace"], "comisiones_cf");
    assert_eq!(body["label"], "Comisiones CF");
    assert_eq!(body["controls"]["canArchive"], true);
    assert_eq!(body["documents"][0]["status"], "archived");
    assert_eq!(body["documents"][0]["actions"]["canArchive"], false);
}

#[actix_web::test]
async fn test_workspace_list_per_role() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri("/workspaces")
        .insert_header(bearer(Role::Intendente))
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["workspace"], "cam");
    assert_eq!(body[0]["label"], "CAM");
    assert_eq!(body[0]["access"]["canView"], true);

    let req = test::TestRequest::get()
        .uri("/workspaces")
        .insert_header(bearer(Role::Administrador))
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body.as_array().map(Vec::len), Some(5));

    let req = test::TestRequest::get().uri("/workspaces").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_encoded_alias_segment() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri("/workspaces/comisiones%20cf")
        .insert_header(bearer(Role::CfMember))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(read_json(resp).await["workspace"], "comisiones_cf");

    let req = test::TestRequest::get()
        .uri("/workspaces/cam%FF")
        .insert_header(bearer(Role::Administrador))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(resp).await["denied"]["kind"], "not_recognized");
}
