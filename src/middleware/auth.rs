// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, models::auth::Role};

// Contexto resolvido do chamador autenticado. É a única fonte de
// tenant/agência/papel consumida pelos handlers e pela política de acesso.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub agency_id: Option<Uuid>,
    pub role: Role,
}

// Guardião: valida o bearer token, resolve o contexto do tenant e o
// injeta nos "extensions" da requisição. Nenhuma mutação acontece aqui.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthenticated)?;

    let context = app_state.auth_service.resolve_context(token).await?;

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

// Extrator para obter o contexto diretamente nos handlers
impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}
