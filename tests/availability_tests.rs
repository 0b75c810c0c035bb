use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

#[macro_use]
mod common;

use common::{AuthHelper, TestAssertions, TestContext};

fn colony_ids(record: &Value) -> Vec<String> {
    record["colonies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect()
}

#[actix_web::test]
async fn test_colonies_round_trip_without_duplication() {
    common::setup_test_env();
    let ctx = TestContext::new();
    let category = ctx.seed_category("Plumber").await;
    let z1 = ctx.seed_colony("Green Park").await;
    let z2 = ctx.seed_colony("Lake View").await;
    let (_, token) = ctx.provider(&category).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/availability/me")
        .insert_header(AuthHelper::auth_header(&token))
        .set_json(json!({
            "date": "2025-03-10",
            "startTime": "09:00",
            "endTime": "13:00",
            "colonyIds": [z1.id, z2.id, z1.id],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = test::read_body(resp).await;
    let created: Value = TestAssertions::assert_success_response(&body);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/availability/{}", created["id"].as_str().unwrap()))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let fetched: Value = TestAssertions::assert_success_response(&body);

    assert_eq!(
        colony_ids(&fetched),
        vec![z1.id.to_string(), z2.id.to_string()]
    );
    assert_eq!(fetched["date"], "2025-03-10");
    assert_eq!(fetched["isAvailable"], true);
}

#[actix_web::test]
async fn test_unknown_and_malformed_colony_ids_are_dropped() {
    let ctx = TestContext::new();
    let category = ctx.seed_category("Cleaner").await;
    let zone = ctx.seed_colony("Hill Top").await;
    let (_, token) = ctx.provider(&category).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/availability/me")
        .insert_header(AuthHelper::auth_header(&token))
        .set_json(json!({
            "date": "2025-03-11",
            "startTime": "10:00",
            "endTime": "12:00",
            "colonyIds": format!("{}, not-a-uuid, {}", zone.id, Uuid::new_v4()),
        }))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let created: Value = TestAssertions::assert_success_response(&body);

    assert_eq!(colony_ids(&created), vec![zone.id.to_string()]);
}

#[actix_web::test]
async fn test_invalid_times_are_rejected() {
    let ctx = TestContext::new();
    let category = ctx.seed_category("Cook").await;
    let (_, token) = ctx.provider(&category).await;
    let app = test_app!(ctx);

    for body in [
        json!({ "date": "2025-03-10", "startTime": "9:00", "endTime": "13:00" }),
        json!({ "date": "2025-03-10", "startTime": "09:00" }),
        json!({ "date": "10/03/2025", "startTime": "09:00", "endTime": "13:00" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/availability/me")
            .insert_header(AuthHelper::auth_header(&token))
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {}", body);
    }
}

#[actix_web::test]
async fn test_partial_update_keeps_absent_fields() {
    let ctx = TestContext::new();
    let category = ctx.seed_category("Painter").await;
    let zone = ctx.seed_colony("River Side").await;
    let (_, token) = ctx.provider(&category).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/availability/me")
        .insert_header(AuthHelper::auth_header(&token))
        .set_json(json!({
            "date": "2025-03-12",
            "startTime": "08:00",
            "endTime": "11:00",
            "notes": "Morning only",
            "colonyIds": [zone.id],
        }))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let created: Value = TestAssertions::assert_success_response(&body);
    let uri = format!("/api/v1/availability/{}", created["id"].as_str().unwrap());

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(AuthHelper::auth_header(&token))
        .set_json(json!({ "endTime": "12:30" }))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let updated: Value = TestAssertions::assert_success_response(&body);

    assert_eq!(updated["endTime"], "12:30");
    assert_eq!(updated["startTime"], "08:00");
    assert_eq!(updated["notes"], "Morning only");
    assert_eq!(colony_ids(&updated), vec![zone.id.to_string()]);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(AuthHelper::auth_header(&token))
        .set_json(json!({ "startTime": "8am" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn test_only_owner_or_admin_can_mutate() {
    let ctx = TestContext::new();
    let category = ctx.seed_category("Electrician").await;
    let (_, owner_token) = ctx.provider(&category).await;
    let (_, other_token) = ctx.provider(&category).await;
    let admin_token = ctx.admin_token();
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/availability/me")
        .insert_header(AuthHelper::auth_header(&owner_token))
        .set_json(json!({ "date": "2025-03-10", "startTime": "09:00", "endTime": "10:00" }))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let created: Value = TestAssertions::assert_success_response(&body);
    let uri = format!("/api/v1/availability/{}", created["id"].as_str().unwrap());

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(AuthHelper::auth_header(&other_token))
        .set_json(json!({ "notes": "mine now" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(AuthHelper::auth_header(&other_token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(AuthHelper::auth_header(&admin_token))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let deleted: Value = TestAssertions::assert_success_response(&body);
    assert_eq!(deleted["id"], created["id"]);

    let req = test::TestRequest::get().uri(&uri).to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn test_admin_adds_availability_for_a_provider() {
    let ctx = TestContext::new();
    let category = ctx.seed_category("Gardener").await;
    let (provider, provider_token) = ctx.provider(&category).await;
    let (_, member_token) = ctx.member().await;
    let admin_token = ctx.admin_token();
    let app = test_app!(ctx);

    // Admins must say whose availability this is.
    let req = test::TestRequest::post()
        .uri("/api/v1/availability/me")
        .insert_header(AuthHelper::auth_header(&admin_token))
        .set_json(json!({ "date": "2025-03-10", "startTime": "09:00", "endTime": "10:00" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/availability/me")
        .insert_header(AuthHelper::auth_header(&admin_token))
        .set_json(json!({
            "userId": provider.id,
            "date": "2025-03-10",
            "startTime": "09:00",
            "endTime": "10:00",
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/availability/me")
        .insert_header(AuthHelper::auth_header(&member_token))
        .set_json(json!({ "date": "2025-03-10", "startTime": "09:00", "endTime": "10:00" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/availability/me")
        .insert_header(AuthHelper::auth_header(&provider_token))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let mine: Vec<Value> = TestAssertions::assert_success_response(&body);
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["user"]["id"], provider.id.to_string());

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/availability/user/{}", provider.id))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let listed: Vec<Value> = TestAssertions::assert_success_response(&body);
    assert_eq!(listed.len(), 1);
}
