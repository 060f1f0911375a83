// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        response,
    },
    config::AppState,
    middleware::{auth::TenantContext, i18n::Locale},
    models::auth::{AuthResponse, LoginPayload, RegisterClientPayload, RegisterPressingPayload, User},
};

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterPressingPayload,
    responses(
        (status = 201, description = "Pressing cadastrado (tenant + agência principal + dono)", body = AuthResponse),
        (status = 400, description = "Dados inválidos ou subdomínio já usado")
    )
)]
pub async fn register_pressing(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RegisterPressingPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let auth = app_state
        .auth_service
        .register_pressing(payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, response::ok(auth)))
}

// POST /api/auth/register-client
#[utoipa::path(
    post,
    path = "/api/auth/register-client",
    tag = "Auth",
    request_body = RegisterClientPayload,
    responses(
        (status = 201, description = "Cliente final cadastrado no pressing do subdomínio", body = AuthResponse),
        (status = 404, description = "Pressing não encontrado")
    )
)]
pub async fn register_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RegisterClientPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let auth = app_state
        .auth_service
        .register_client(payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, response::ok(auth)))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let auth = app_state
        .auth_service
        .login(payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, response::ok(auth)))
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuário autenticado", body = User),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let user = app_state
        .auth_service
        .current_user(&ctx)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, response::ok(user)))
}
