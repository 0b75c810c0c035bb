use actix_web::web;

use crate::handlers::needs;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/needs")
            .route("", web::post().to(needs::create_need))
            .route("", web::get().to(needs::get_needs))
            .route("/user/{user_id}", web::get().to(needs::get_user_needs))
            .route(
                "/matching/{provider_id}",
                web::get().to(needs::get_matching_needs),
            )
            .route("/{id}", web::get().to(needs::get_need))
            .route("/{id}", web::delete().to(needs::delete_need)),
    );
}
