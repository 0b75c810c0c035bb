use actix_web::web;

use crate::handlers::availability;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/availability")
            // `/me` must be registered ahead of `/{id}`
            .route("/me", web::post().to(availability::add_my_availability))
            .route("/me", web::get().to(availability::get_my_availability))
            .route("", web::get().to(availability::get_all_availability))
            .route(
                "/user/{user_id}",
                web::get().to(availability::get_user_availability),
            )
            .route("/{id}", web::get().to(availability::get_availability))
            .route("/{id}", web::put().to(availability::update_availability))
            .route("/{id}", web::delete().to(availability::delete_availability)),
    );
}
