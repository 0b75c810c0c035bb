use actix_web::web;

use crate::middleware::RateLimitStore;

pub mod auth;
pub mod availability;
pub mod categories;
pub mod colonies;
pub mod leaves;
pub mod main_categories;
pub mod needs;
pub mod users;

/// Mounts every resource under `/api/v1`. `login_limits` is shared by all
/// workers so the login budget is per client, not per worker.
pub fn configure(login_limits: RateLimitStore) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::scope("/api/v1")
                .configure(auth::configure(login_limits))
                .configure(users::configure)
                .configure(colonies::configure)
                .configure(categories::configure)
                .configure(main_categories::configure)
                .configure(leaves::configure)
                .configure(availability::configure)
                .configure(needs::configure),
        );
    }
}
