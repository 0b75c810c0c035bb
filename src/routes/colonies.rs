use actix_web::web;

use crate::handlers::colonies;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/colonies")
            .route("", web::post().to(colonies::create_colony))
            .route("", web::get().to(colonies::list_colonies))
            .route("/{id}", web::get().to(colonies::get_colony))
            .route("/{id}", web::put().to(colonies::update_colony))
            .route("/{id}", web::delete().to(colonies::delete_colony)),
    );
}
