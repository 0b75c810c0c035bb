use actix_web::web;

use crate::handlers::categories;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/service-categories")
            .route("", web::post().to(categories::create_category))
            .route("", web::get().to(categories::list_categories))
            .route("/{id}", web::get().to(categories::get_category))
            .route("/{id}", web::put().to(categories::update_category))
            .route("/{id}", web::delete().to(categories::deactivate_category)),
    );
}
