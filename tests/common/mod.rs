#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use chrono::NaiveDate;
use fake::Fake;
use fake::faker::address::en::StreetName;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use uuid::Uuid;

use society_be::config::Config;
use society_be::database::models::*;
use society_be::handlers::shared::ApiResponse;
use society_be::middleware::RateLimitStore;
use society_be::services::FixedClock;
use society_be::services::auth::{Claims, Role};
use society_be::{AppState, Stores};

/// Builds the full `/api/v1` service over the context's in-memory state.
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ctx.state.clone())
                .app_data(actix_web::web::Data::new($ctx.config.clone()))
                .app_data(society_be::handlers::shared::json_config())
                .app_data(society_be::handlers::shared::query_config())
                .app_data(society_be::handlers::shared::path_config())
                .configure(society_be::routes::configure($ctx.login_limits.clone())),
        )
        .await
    };
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

// Test application wrapper
pub struct TestContext {
    pub config: Config,
    pub state: web::Data<AppState>,
    pub login_limits: RateLimitStore,
}

impl TestContext {
    pub fn new() -> Self {
        Self::on(date("2025-03-09"))
    }

    /// Context whose clock reports `today` as the current date.
    pub fn on(today: NaiveDate) -> Self {
        let config = Config::test_config();
        let state = web::Data::new(AppState::new(
            config.clone(),
            Stores::memory(),
            Arc::new(FixedClock::on(today)),
        ));

        TestContext {
            config,
            state,
            login_limits: RateLimitStore::new(),
        }
    }

    pub fn admin_claims(&self) -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            role: Role::Admin,
            exp: usize::MAX,
        }
    }

    pub fn token(&self, claims: &Claims) -> String {
        self.state
            .auth_service
            .generate_token(claims.sub, claims.role)
            .expect("Failed to sign test token")
    }

    pub fn admin_token(&self) -> String {
        self.token(&self.admin_claims())
    }

    pub async fn seed_category(&self, name: &str) -> ServiceCategory {
        self.state
            .directory_service
            .create_category(
                &self.admin_claims(),
                CategoryInput {
                    name: Some(name.to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("Failed to seed category")
    }

    pub async fn seed_colony(&self, name: &str) -> Colony {
        self.state
            .directory_service
            .create_colony(
                &self.admin_claims(),
                ColonyInput {
                    name: Some(name.to_string()),
                    city: Some("Pune".to_string()),
                    pincode: Some(411001),
                    ..Default::default()
                },
            )
            .await
            .expect("Failed to seed colony")
    }

    /// Registers a user through the auth service and returns it with a token.
    pub async fn register(&self, input: RegisterUserInput) -> (User, String) {
        let response = self
            .state
            .auth_service
            .register_user(input)
            .await
            .expect("Failed to register test user");
        (response.user, response.token)
    }

    pub async fn provider(&self, category: &ServiceCategory) -> (User, String) {
        self.register(MockData::provider(category.id)).await
    }

    pub async fn member(&self) -> (User, String) {
        self.register(MockData::member()).await
    }
}

// Mock data generators
pub struct MockData;

impl MockData {
    pub fn mobile_number() -> String {
        format!("98{:08}", (0..100_000_000u32).fake::<u32>())
    }

    pub fn member() -> RegisterUserInput {
        RegisterUserInput {
            full_name: Name().fake(),
            mobile_number: Self::mobile_number(),
            whatsapp_number: None,
            email: None,
            password: "password123".to_string(),
            address: StreetName().fake(),
            pincode: 411001,
            role: UserRole::SocietyMember,
            service_category_id: None,
            experience: None,
            service_charge: None,
        }
    }

    pub fn provider(service_category_id: Uuid) -> RegisterUserInput {
        RegisterUserInput {
            role: UserRole::SocietyService,
            service_category_id: Some(service_category_id),
            experience: Some("5 years".to_string()),
            service_charge: Some("300/visit".to_string()),
            ..Self::member()
        }
    }

    pub fn description() -> String {
        Sentence(3..8).fake()
    }
}

// Authentication helpers
pub struct AuthHelper;

impl AuthHelper {
    pub fn auth_header(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token))
    }
}

// Test assertion helpers
pub struct TestAssertions;

impl TestAssertions {
    pub fn assert_success_response<T>(body: &[u8]) -> T
    where
        T: serde::de::DeserializeOwned,
    {
        let response: ApiResponse<T> =
            serde_json::from_slice(body).expect("Failed to parse JSON response");

        assert!(
            response.success,
            "Expected successful response but got error: {:?}",
            response.message
        );
        response.data.expect("Expected data in successful response")
    }

    pub fn assert_error_response(body: &[u8]) -> ApiResponse<serde_json::Value> {
        let response: ApiResponse<serde_json::Value> =
            serde_json::from_slice(body).expect("Failed to parse JSON response");

        assert!(!response.success, "Expected an error envelope");
        assert!(response.message.is_some(), "Expected an error message");
        response
    }
}

pub fn setup_test_env() {
    let _ = env_logger::builder().is_test(true).try_init();
}
