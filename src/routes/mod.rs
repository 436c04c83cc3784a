pub mod auth;
pub mod content;
pub mod health;
pub mod users;

use actix_web::web;

/// Routes mounted under `/api`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::login)
            .service(auth::signup),
    )
    .service(
        web::scope("/test")
            .service(content::all_access)
            .service(content::user_access)
            .service(content::moderator_access)
            .service(content::admin_access),
    )
    .service(web::scope("/users").service(users::me));
}
