//! Role demonstration endpoints under `/api/test`.
//!
//! The route policy already gates these paths ahead of routing. The role
//! handlers check their role again against the request's [`SecurityContext`],
//! so a path spelled differently from the policy pattern still cannot reach
//! them without the role.

use actix_web::{get, HttpRequest, HttpResponse, Responder};

use crate::auth::{MessageResponse, SecurityContext, Unauthorized};
use crate::models::{Principal, Role};

fn require_role<'a>(
    req: &HttpRequest,
    ctx: &'a SecurityContext,
    roles: &[Role],
) -> Result<&'a Principal, Unauthorized> {
    ctx.require_any_role(roles)
        .map_err(|reason| Unauthorized::new(req.match_info().as_str(), reason))
}

#[get("/all")]
pub async fn all_access(ctx: SecurityContext) -> impl Responder {
    let message = match ctx.principal() {
        Some(principal) => format!("Public Content. Signed in as {}.", principal.username),
        None => "Public Content.".to_string(),
    };
    HttpResponse::Ok().json(MessageResponse::new(message))
}

#[get("/user")]
pub async fn user_access(
    req: HttpRequest,
    ctx: SecurityContext,
) -> Result<HttpResponse, Unauthorized> {
    let principal = require_role(&req, &ctx, &Role::ALL)?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "User Content for {}.",
        principal.username
    ))))
}

#[get("/mod")]
pub async fn moderator_access(
    req: HttpRequest,
    ctx: SecurityContext,
) -> Result<HttpResponse, Unauthorized> {
    let principal = require_role(&req, &ctx, &[Role::Moderator])?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Moderator Board for {}.",
        principal.username
    ))))
}

#[get("/admin")]
pub async fn admin_access(
    req: HttpRequest,
    ctx: SecurityContext,
) -> Result<HttpResponse, Unauthorized> {
    let principal = require_role(&req, &ctx, &[Role::Admin])?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Admin Board for {}.",
        principal.username
    ))))
}
