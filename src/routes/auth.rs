use actix_web::web;

use crate::handlers::auth;
use crate::middleware::{RateLimitMiddleware, RateLimitStore};

pub fn configure(login_limits: RateLimitStore) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::scope("/auth")
                .route("/register", web::post().to(auth::register))
                .service(
                    web::resource("/login")
                        .wrap(RateLimitMiddleware::login(login_limits.clone()))
                        .route(web::post().to(auth::login)),
                )
                .route("/me", web::get().to(auth::me)),
        )
        .service(
            web::scope("/admin")
                .route("/create", web::post().to(auth::create_admin))
                .route("/list", web::get().to(auth::list_admins))
                .service(
                    web::resource("/login")
                        .wrap(RateLimitMiddleware::login(login_limits.clone()))
                        .route(web::post().to(auth::admin_login)),
                ),
        );
    }
}
