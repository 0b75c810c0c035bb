use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

#[macro_use]
mod common;

use common::{AuthHelper, MockData, TestAssertions, TestContext};
use society_be::services::need::NO_AVAILABILITY_HINT;

#[actix_web::test]
async fn test_provider_sees_open_need_in_available_colony() {
    common::setup_test_env();
    let ctx = TestContext::on(common::date("2025-03-09"));
    let plumbing = ctx.seed_category("Plumber").await;
    let cleaning = ctx.seed_category("Cleaner").await;
    let zone = ctx.seed_colony("Green Park").await;
    let elsewhere = ctx.seed_colony("Lake View").await;
    let (provider, provider_token) = ctx.provider(&plumbing).await;
    let (_, member_token) = ctx.member().await;
    let app = test_app!(ctx);

    for date in ["2025-03-10", "2025-03-12"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/availability/me")
            .insert_header(AuthHelper::auth_header(&provider_token))
            .set_json(json!({
                "date": date,
                "startTime": "09:00",
                "endTime": "17:00",
                "colonyIds": [zone.id],
            }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );
    }

    let mut posted = Vec::new();
    for (category, colony) in [(&plumbing, &zone), (&plumbing, &elsewhere), (&cleaning, &zone)] {
        let req = test::TestRequest::post()
            .uri("/api/v1/needs")
            .insert_header(AuthHelper::auth_header(&member_token))
            .set_json(json!({
                "serviceCategoryId": category.id,
                "colonyId": colony.id,
                "description": MockData::description(),
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = test::read_body(resp).await;
        let need: Value = TestAssertions::assert_success_response(&body);
        posted.push(need);
    }

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/needs/matching/{}?serviceCategory=plumber",
            provider.id
        ))
        .insert_header(AuthHelper::auth_header(&provider_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let result: Value = TestAssertions::assert_success_response(&body);

    assert_eq!(result["totalNeeds"], 1);
    assert_eq!(result["availableColoniesCount"], 1);
    assert_eq!(result["availabilityRecordsCount"], 2);
    assert_eq!(result["needs"][0]["id"], posted[0]["id"]);
    assert_eq!(result["needs"][0]["colony"]["name"], "Green Park");
    assert_eq!(result["needs"][0]["serviceCategory"]["name"], "Plumber");
    assert_eq!(result["colonies"][0]["id"], zone.id.to_string());
}

#[actix_web::test]
async fn test_past_availability_does_not_count() {
    let ctx = TestContext::on(common::date("2025-03-20"));
    let category = ctx.seed_category("Electrician").await;
    let zone = ctx.seed_colony("Old Town").await;
    let (provider, token) = ctx.provider(&category).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/availability/me")
        .insert_header(AuthHelper::auth_header(&token))
        .set_json(json!({
            "date": "2025-03-10",
            "startTime": "09:00",
            "endTime": "17:00",
            "colonyIds": [zone.id],
        }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/needs/matching/{}?serviceCategory=Electrician",
            provider.id
        ))
        .insert_header(AuthHelper::auth_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let result: Value = TestAssertions::assert_success_response(&body);

    assert_eq!(result["totalNeeds"], 0);
    assert_eq!(result["availableColoniesCount"], 0);
    assert_eq!(result["message"], NO_AVAILABILITY_HINT);
}

#[actix_web::test]
async fn test_no_availability_returns_hint_not_error() {
    let ctx = TestContext::new();
    let category = ctx.seed_category("Carpenter").await;
    let (provider, token) = ctx.provider(&category).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/needs/matching/{}?serviceCategory=Carpenter",
            provider.id
        ))
        .insert_header(AuthHelper::auth_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let envelope: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["message"], NO_AVAILABILITY_HINT);
    assert_eq!(envelope["data"]["needs"], json!([]));
    assert_eq!(envelope["data"]["availabilityRecordsCount"], 0);
}

#[actix_web::test]
async fn test_category_must_match_provider_declaration() {
    let ctx = TestContext::new();
    let declared = ctx.seed_category("Plumber").await;
    ctx.seed_category("Cook").await;
    let (provider, token) = ctx.provider(&declared).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/needs/matching/{}?serviceCategory=Cook",
            provider.id
        ))
        .insert_header(AuthHelper::auth_header(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/needs/matching/{}", provider.id))
        .insert_header(AuthHelper::auth_header(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn test_matching_rejects_members_and_strangers() {
    let ctx = TestContext::new();
    let category = ctx.seed_category("Tutor").await;
    let (provider, _) = ctx.provider(&category).await;
    let (member, member_token) = ctx.member().await;
    let admin_token = ctx.admin_token();
    let app = test_app!(ctx);

    // Someone else's matches are off limits.
    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/needs/matching/{}?serviceCategory=Tutor",
            provider.id
        ))
        .insert_header(AuthHelper::auth_header(&member_token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    // Members are not providers.
    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/needs/matching/{}?serviceCategory=Tutor",
            member.id
        ))
        .insert_header(AuthHelper::auth_header(&admin_token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/needs/matching/{}?serviceCategory=Tutor",
            uuid::Uuid::new_v4()
        ))
        .insert_header(AuthHelper::auth_header(&admin_token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn test_need_lifecycle() {
    let ctx = TestContext::new();
    let category = ctx.seed_category("Driver").await;
    let zone = ctx.seed_colony("Station Road").await;
    let (member, member_token) = ctx.member().await;
    let (_, other_token) = ctx.member().await;
    let (_, provider_token) = ctx.provider(&category).await;
    let app = test_app!(ctx);

    // Providers do not post needs.
    let req = test::TestRequest::post()
        .uri("/api/v1/needs")
        .insert_header(AuthHelper::auth_header(&provider_token))
        .set_json(json!({
            "serviceCategoryId": category.id,
            "colonyId": zone.id,
            "description": "Airport drop",
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/needs")
        .insert_header(AuthHelper::auth_header(&member_token))
        .set_json(json!({
            "serviceCategoryId": category.id,
            "colonyId": uuid::Uuid::new_v4(),
            "description": "Airport drop",
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/needs")
        .insert_header(AuthHelper::auth_header(&member_token))
        .set_json(json!({
            "serviceCategoryId": category.id,
            "colonyId": zone.id,
            "description": "Airport drop",
        }))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let need: Value = TestAssertions::assert_success_response(&body);
    assert_eq!(need["status"], "open");
    assert_eq!(need["user"]["id"], member.id.to_string());

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/needs?colonyId={}&status=open", zone.id))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let listed: Vec<Value> = TestAssertions::assert_success_response(&body);
    assert_eq!(listed.len(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/needs/user/{}", member.id))
        .to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    let mine: Vec<Value> = TestAssertions::assert_success_response(&body);
    assert_eq!(mine.len(), 1);

    let uri = format!("/api/v1/needs/{}", need["id"].as_str().unwrap());
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
        .insert_header(AuthHelper::auth_header(&member_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri(&uri).to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}
