// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{LoginRequest, RegisterRequest, User},
    state::Identity,
    utils::{
        html::clean_text,
        jwt::{Claims, sign_jwt},
    },
};

fn token_response(user: &User, config: &Config) -> Result<serde_json::Value, AppError> {
    let token = sign_jwt(
        &user.id,
        &user.display_name,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(json!({
        "token": token,
        "type": "Bearer",
        "user": user
    }))
}

/// Registers a new user through the identity provider.
///
/// The display name is stripped of markup before it is stored.
/// Returns 201 Created with a token and the user.
pub async fn register(
    State(identity): State<Identity>,
    State(config): State<Config>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let display_name = clean_text(&payload.display_name);
    if display_name.is_empty() {
        return Err(AppError::BadRequest(
            "Display name must contain visible text".to_string(),
        ));
    }

    let user = identity
        .register(&payload.email, &payload.password, &display_name)
        .await?;
    tracing::info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(token_response(&user, &config)?)))
}

/// Authenticates a user and returns a JWT token.
pub async fn login(
    State(identity): State<Identity>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = identity.login(&payload.email, &payload.password).await?;

    Ok(Json(token_response(&user, &config)?))
}

/// Signs the caller out. The token itself stays valid until it expires.
pub async fn logout(
    State(identity): State<Identity>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    identity.logout(&claims.sub).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the signed-in user behind the token.
pub async fn me(
    State(identity): State<Identity>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = identity
        .current_user(&claims.sub)
        .await
        .ok_or(AppError::AuthError("Not signed in".to_string()))?;

    Ok(Json(user))
}
