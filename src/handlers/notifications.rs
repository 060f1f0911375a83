// src/handlers/notifications.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::{
        error::ApiError,
        response::{self, PageQuery, Pagination},
    },
    config::AppState,
    middleware::{auth::TenantContext, i18n::Locale},
    models::notifications::InternalNotification,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFilter {
    #[serde(default)]
    pub unread_only: bool,
}

// GET /api/notifications
#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notifications",
    params(PageQuery, NotificationFilter),
    responses(
        (status = 200, description = "Notificações do usuário autenticado", body = Vec<InternalNotification>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_notifications(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Query(page): Query<PageQuery>,
    Query(filter): Query<NotificationFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let (notifications, total) = app_state
        .notification_service
        .list_mine(&ctx, filter.unread_only, page.limit(), page.offset())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let pagination = Pagination::new(page.page(), page.limit(), total);
    Ok((StatusCode::OK, response::ok_paginated(notifications, pagination)))
}

// PATCH /api/notifications/{id}/read
#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    tag = "Notifications",
    params(("id" = Uuid, Path, description = "ID da notificação")),
    responses(
        (status = 200, description = "Notificação marcada como lida"),
        (status = 404, description = "Notificação não encontrada (ou de outro usuário)")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_notification_read(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Path(notification_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .notification_service
        .mark_read(&ctx, notification_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, response::ok(())))
}
