use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

#[macro_use]
mod common;

use common::{AuthHelper, TestAssertions, TestContext};

#[actix_web::test]
async fn test_apply_leave_requires_token() {
    common::setup_test_env();
    let ctx = TestContext::new();
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/leaves")
        .set_json(json!({ "startDate": "2025-04-01", "endDate": "2025-04-03" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_single_leaves_sharing_a_boundary_day_conflict() {
    common::setup_test_env();
    let ctx = TestContext::new();
    let category = ctx.seed_category("Plumber").await;
    let (_, token) = ctx.provider(&category).await;
    let app = test_app!(ctx);

    let first = test::TestRequest::post()
        .uri("/api/v1/leaves")
        .insert_header(AuthHelper::auth_header(&token))
        .set_json(json!({ "leaveType": "single", "startDate": "2025-04-01", "endDate": "2025-04-03" }))
        .to_request();
    let resp = test::call_service(&app, first).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = test::read_body(resp).await;
    let first: Value = TestAssertions::assert_success_response(&body);
    assert_eq!(first["status"], "pending");

    let second = test::TestRequest::post()
        .uri("/api/v1/leaves")
        .insert_header(AuthHelper::auth_header(&token))
        .set_json(json!({ "leaveType": "single", "startDate": "2025-04-03", "endDate": "2025-04-05" }))
        .to_request();
    let resp = test::call_service(&app, second).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body = test::read_body(resp).await;
    let error = TestAssertions::assert_error_response(&body);
    let existing = error.data.expect("conflict carries the colliding leave");
    assert_eq!(existing["id"], first["id"]);
    assert_eq!(existing["startDate"], "2025-04-01");
    assert_eq!(existing["endDate"], "2025-04-03");
}

#[actix_web::test]
async fn test_adjacent_single_leaves_are_accepted() {
    let ctx = TestContext::new();
    let category = ctx.seed_category("Electrician").await;
    let (_, token) = ctx.provider(&category).await;
    let app = test_app!(ctx);

    for (start, end) in [("2025-04-01", "2025-04-03"), ("2025-04-04", "2025-04-06")] {
        let req = test::TestRequest::post()
            .uri("/api/v1/leaves")
            .insert_header(AuthHelper::auth_header(&token))
            .set_json(json!({ "startDate": start, "endDate": end }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
}

#[actix_web::test]
async fn test_second_active_weekly_leave_conflicts_regardless_of_days() {
    let ctx = TestContext::new();
    let category = ctx.seed_category("Gardener").await;
    let (_, token) = ctx.provider(&category).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/leaves")
        .insert_header(AuthHelper::auth_header(&token))
        .set_json(json!({ "leaveType": "weekly", "weeklyDays": [0, 6] }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/leaves")
        .insert_header(AuthHelper::auth_header(&token))
        .set_json(json!({ "leaveType": "weekly", "weeklyDays": [3] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body = test::read_body(resp).await;
    let error = TestAssertions::assert_error_response(&body);
    assert_eq!(error.data.unwrap()["weeklyDays"], json!([0, 6]));
}

#[actix_web::test]
async fn test_malformed_leave_requests_are_rejected() {
    let ctx = TestContext::new();
    let category = ctx.seed_category("Carpenter").await;
    let (_, token) = ctx.provider(&category).await;
    let app = test_app!(ctx);

    let bodies = [
        json!({ "startDate": "2025-04-05", "endDate": "2025-04-01" }),
        json!({ "startDate": "2025-02-30", "endDate": "2025-03-01" }),
        json!({ "leaveType": "weekly", "weeklyDays": [] }),
        json!({ "leaveType": "weekly", "weeklyDays": [7] }),
        json!({ "leaveType": "weekly", "weeklyDays": [1], "startDate": "2025-04-01" }),
        json!({ "leaveType": "monthly" }),
    ];

    for body in bodies {
        let req = test::TestRequest::post()
            .uri("/api/v1/leaves")
            .insert_header(AuthHelper::auth_header(&token))
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {}", body);
    }
}

#[actix_web::test]
async fn test_members_cannot_apply_for_leave() {
    let ctx = TestContext::new();
    let (_, token) = ctx.member().await;
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/leaves")
        .insert_header(AuthHelper::auth_header(&token))
        .set_json(json!({ "startDate": "2025-04-01", "endDate": "2025-04-01" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_approved_weekly_leave_covers_saturday() {
    let ctx = TestContext::new();
    let category = ctx.seed_category("Cook").await;
    let (provider, token) = ctx.provider(&category).await;
    let admin_token = ctx.admin_token();
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/leaves")
        .insert_header(AuthHelper::auth_header(&token))
        .set_json(json!({ "leaveType": "weekly", "weeklyDays": [0, 6] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = test::read_body(resp).await;
    let leave: Value = TestAssertions::assert_success_response(&body);

    // Pending leaves do not count yet.
    let check_uri = format!("/api/v1/leaves/on-leave/{}?date=2025-03-15", provider.id);
    let req = test::TestRequest::get()
        .uri(&check_uri)
        .insert_header(AuthHelper::auth_header(&token))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let check: Value = TestAssertions::assert_success_response(&body);
    assert_eq!(check["isOnLeave"], false);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/leaves/{}/status", leave["id"].as_str().unwrap()))
        .insert_header(AuthHelper::auth_header(&admin_token))
        .set_json(json!({ "status": "approved" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri(&check_uri)
            .insert_header(AuthHelper::auth_header(&token))
            .to_request();
        let body = test::read_body(test::call_service(&app, req).await).await;
        let check: Value = TestAssertions::assert_success_response(&body);
        assert_eq!(check["isOnLeave"], true);
        assert_eq!(check["leaveType"], "weekly");
        assert_eq!(check["date"], "2025-03-15");
    }

    // Friday is not in the pattern.
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/leaves/on-leave/{}?date=2025-03-14", provider.id))
        .insert_header(AuthHelper::auth_header(&token))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let check: Value = TestAssertions::assert_success_response(&body);
    assert_eq!(check["isOnLeave"], false);
    assert_eq!(check["leaveType"], Value::Null);
}

#[actix_web::test]
async fn test_on_leave_defaults_to_today() {
    let ctx = TestContext::on(common::date("2025-04-02"));
    let category = ctx.seed_category("Driver").await;
    let (provider, token) = ctx.provider(&category).await;
    let admin_token = ctx.admin_token();
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/leaves")
        .insert_header(AuthHelper::auth_header(&token))
        .set_json(json!({ "startDate": "2025-04-01", "endDate": "2025-04-03" }))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let leave: Value = TestAssertions::assert_success_response(&body);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/leaves/{}/status", leave["id"].as_str().unwrap()))
        .insert_header(AuthHelper::auth_header(&admin_token))
        .set_json(json!({ "status": "approved" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/leaves/on-leave/{}", provider.id))
        .insert_header(AuthHelper::auth_header(&token))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let check: Value = TestAssertions::assert_success_response(&body);
    assert_eq!(check["isOnLeave"], true);
    assert_eq!(check["leaveType"], "single");
    assert_eq!(check["date"], "2025-04-02");
}

#[actix_web::test]
async fn test_status_changes_are_admin_only_and_once() {
    let ctx = TestContext::new();
    let category = ctx.seed_category("Painter").await;
    let (_, token) = ctx.provider(&category).await;
    let admin_token = ctx.admin_token();
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/leaves")
        .insert_header(AuthHelper::auth_header(&token))
        .set_json(json!({ "startDate": "2025-05-01", "endDate": "2025-05-02" }))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let leave: Value = TestAssertions::assert_success_response(&body);
    let status_uri = format!("/api/v1/leaves/{}/status", leave["id"].as_str().unwrap());

    let req = test::TestRequest::patch()
        .uri(&status_uri)
        .insert_header(AuthHelper::auth_header(&token))
        .set_json(json!({ "status": "approved" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::patch()
        .uri(&status_uri)
        .insert_header(AuthHelper::auth_header(&admin_token))
        .set_json(json!({ "status": "rejected" }))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let rejected: Value = TestAssertions::assert_success_response(&body);
    assert_eq!(rejected["status"], "rejected");

    let req = test::TestRequest::patch()
        .uri(&status_uri)
        .insert_header(AuthHelper::auth_header(&admin_token))
        .set_json(json!({ "status": "approved" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    // A rejected leave no longer blocks the same range.
    let req = test::TestRequest::post()
        .uri("/api/v1/leaves")
        .insert_header(AuthHelper::auth_header(&token))
        .set_json(json!({ "startDate": "2025-05-01", "endDate": "2025-05-02" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );
}

#[actix_web::test]
async fn test_cancel_is_owner_or_admin() {
    let ctx = TestContext::new();
    let category = ctx.seed_category("Tutor").await;
    let (_, owner_token) = ctx.provider(&category).await;
    let (_, other_token) = ctx.provider(&category).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/leaves")
        .insert_header(AuthHelper::auth_header(&owner_token))
        .set_json(json!({ "leaveType": "weekly", "weeklyDays": ["1", 1, 2] }))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let leave: Value = TestAssertions::assert_success_response(&body);
    assert_eq!(leave["weeklyDays"], json!([1, 2]));
    let leave_uri = format!("/api/v1/leaves/{}", leave["id"].as_str().unwrap());

    let req = test::TestRequest::delete()
        .uri(&leave_uri)
        .insert_header(AuthHelper::auth_header(&other_token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::delete()
        .uri(&leave_uri)
        .insert_header(AuthHelper::auth_header(&owner_token))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let removed: Value = TestAssertions::assert_success_response(&body);
    assert_eq!(removed["id"], leave["id"]);

    let req = test::TestRequest::get()
        .uri(&leave_uri)
        .insert_header(AuthHelper::auth_header(&owner_token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    // With the old pattern gone a new one can be requested.
    let req = test::TestRequest::post()
        .uri("/api/v1/leaves")
        .insert_header(AuthHelper::auth_header(&owner_token))
        .set_json(json!({ "leaveType": "weekly", "weeklyDays": [5] }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );
}
