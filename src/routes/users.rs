use actix_web::web;

use crate::handlers::users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Literal segments before `/{id}` so they are not parsed as ids
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(users::list_users))
            .route("/tatkal", web::get().to(users::list_tatkal_users))
            .route("/me", web::put().to(users::update_my_profile))
            .route("/me/tatkal", web::patch().to(users::set_my_tatkal_status))
            .route("/{id}", web::put().to(users::update_user))
            .route("/{id}", web::delete().to(users::delete_user))
            .route("/{id}/block", web::patch().to(users::set_user_blocked)),
    );
}
