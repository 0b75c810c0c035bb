use actix_web::web;

use crate::handlers::leaves;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/leaves")
            .route("", web::post().to(leaves::apply_leave))
            .route("", web::get().to(leaves::get_leaves))
            .route("/on-leave/{user_id}", web::get().to(leaves::check_on_leave))
            .route("/{id}", web::get().to(leaves::get_leave))
            .route("/{id}/status", web::patch().to(leaves::update_leave_status))
            .route("/{id}", web::delete().to(leaves::cancel_leave)),
    );
}
