use crate::{
    auth::{signup::register_user, JwtResponse, LoginRequest, MessageResponse, SignupRequest},
    error::AppError,
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Login user
///
/// Verifies the credentials and returns the user's identity, roles and a bearer token.
/// An unknown username and a wrong password both answer `401 Bad credentials`.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let principal = state
        .manager
        .authenticate(&login_data.username, &login_data.password)
        .await?;
    let token = state.tokens.issue(&principal)?;

    Ok(HttpResponse::Ok().json(JwtResponse::new(principal, token)))
}

/// Register a new user
///
/// Fails with `400` when the username or email is already taken.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    signup_data.validate()?;

    register_user(
        state.users.as_ref(),
        state.roles.as_ref(),
        state.manager.hasher(),
        signup_data.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("User registered successfully!")))
}
