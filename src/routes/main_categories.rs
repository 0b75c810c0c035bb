use actix_web::web;

use crate::handlers::main_categories;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/main-categories")
            .route("", web::get().to(main_categories::list_main_categories))
            .route("", web::post().to(main_categories::create_main_category))
            .route(
                "/admin/all",
                web::get().to(main_categories::list_all_main_categories),
            )
            .route(
                "/admin/{id}",
                web::get().to(main_categories::get_main_category_admin),
            )
            .route("/{id}", web::get().to(main_categories::get_main_category))
            .route("/{id}", web::put().to(main_categories::update_main_category))
            .route(
                "/{id}",
                web::delete().to(main_categories::deactivate_main_category),
            ),
    );
}
