use actix_web::{get, HttpResponse, Responder};

use crate::auth::AuthenticatedPrincipal;

/// Current user
///
/// Returns the principal resolved for this request (id, username, email, roles).
#[get("/me")]
pub async fn me(AuthenticatedPrincipal(principal): AuthenticatedPrincipal) -> impl Responder {
    HttpResponse::Ok().json(principal)
}
