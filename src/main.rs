use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use society_be::database::init_database;
use society_be::handlers::shared::{json_config, path_config, query_config};
use society_be::middleware::{RateLimitStore, RequestIdMiddleware, cleanup_rate_limits};
use society_be::services::SystemClock;
use society_be::{AppState, Config, Stores, routes};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Society services API v1.0",
        "status": "running"
    }))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env()?;
    log::info!(
        "Starting society services API (environment: {})",
        config.environment
    );

    let stores = if config.uses_memory_store() {
        log::warn!("DATABASE_URL is \"memory\"; data will not survive a restart");
        Stores::memory()
    } else {
        let pool = init_database(&config.database_url).await?;
        log::info!("Database initialized");
        Stores::postgres(pool)
    };

    let app_state = web::Data::new(AppState::new(
        config.clone(),
        stores,
        Arc::new(SystemClock),
    ));
    let config_data = web::Data::new(config.clone());

    let login_limits = RateLimitStore::new();
    tokio::spawn(cleanup_rate_limits(login_limits.clone(), 300));

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(config_data.clone())
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .wrap(
                Cors::default()
                    .allowed_origin(&config_data.cors_origin)
                    .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .supports_credentials()
                    .max_age(3600),
            )
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(health)
            .configure(routes::configure(login_limits.clone()))
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
