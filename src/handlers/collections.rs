// src/handlers/collections.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        response::{self, PageQuery, Pagination},
    },
    config::AppState,
    middleware::{auth::TenantContext, i18n::Locale},
    models::collections::{CollectionRequest, CollectionStatus},
    services::collection_service::{
        CollectedItem, CollectionOutcome, CollectionRequestDetail, NewCollectionItem,
        NewCollectionRequest,
    },
};

// Serialize porque o validador de length serializa o item rejeitado
// nos parâmetros do erro.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItemPayload {
    #[schema(example = "Sacola de roupas brancas")]
    pub description: String,

    #[schema(value_type = String, example = "2.5")]
    pub estimated_weight: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionPayload {
    // Obrigatório para agentes; ignorado para clientes (a ficha é a deles)
    pub customer_id: Option<Uuid>,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Rua das Acácias, 12")]
    pub collection_address: String,

    #[schema(value_type = String, format = Date, example = "2026-09-01")]
    pub collection_date: NaiveDate,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "14:00-16:00")]
    pub collection_time: String,

    #[schema(example = "BIENVENUE10")]
    pub promo_code: Option<String>,

    #[validate(length(min = 1, message = "collection_items_required"))]
    pub items: Vec<CollectionItemPayload>,
}

// POST /api/collections
#[utoipa::path(
    post,
    path = "/api/collections",
    tag = "Collections",
    request_body = CreateCollectionPayload,
    responses(
        (status = 201, description = "Solicitação de coleta criada (PENDING)", body = CollectionRequestDetail),
        (status = 400, description = "Promo inválida ou itens ausentes")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_collection(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Json(payload): Json<CreateCollectionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let input = NewCollectionRequest {
        customer_id: payload.customer_id,
        collection_address: payload.collection_address,
        collection_date: payload.collection_date,
        collection_time: payload.collection_time,
        promo_code: payload.promo_code,
        items: payload
            .items
            .into_iter()
            .map(|i| NewCollectionItem {
                description: i.description,
                estimated_weight: i.estimated_weight,
            })
            .collect(),
    };

    let detail = app_state
        .collection_service
        .create_request(&ctx, input)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, response::ok(detail)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CollectionFilter {
    // PENDING | ASSIGNED | IN_PROGRESS | COLLECTED | CANCELLED
    pub status: Option<CollectionStatus>,
}

// GET /api/collections
#[utoipa::path(
    get,
    path = "/api/collections",
    tag = "Collections",
    params(PageQuery, CollectionFilter),
    responses(
        (status = 200, description = "Coletas visíveis no escopo do chamador", body = Vec<CollectionRequest>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_collections(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Query(page): Query<PageQuery>,
    Query(filter): Query<CollectionFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let (requests, total) = app_state
        .collection_service
        .list_requests(&ctx, filter.status, page.limit(), page.offset())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let pagination = Pagination::new(page.page(), page.limit(), total);
    Ok((StatusCode::OK, response::ok_paginated(requests, pagination)))
}

// GET /api/collections/{id}
#[utoipa::path(
    get,
    path = "/api/collections/{id}",
    tag = "Collections",
    params(("id" = Uuid, Path, description = "ID da solicitação")),
    responses(
        (status = 200, description = "Solicitação com itens", body = CollectionRequestDetail),
        (status = 404, description = "Solicitação não encontrada (ou fora do escopo)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_collection(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Path(request_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .collection_service
        .get_request(&ctx, request_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, response::ok(detail)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignCollectorPayload {
    pub collector_id: Uuid,
}

// PATCH /api/collections/{id}/assign
#[utoipa::path(
    patch,
    path = "/api/collections/{id}/assign",
    tag = "Collections",
    params(("id" = Uuid, Path, description = "ID da solicitação")),
    request_body = AssignCollectorPayload,
    responses(
        (status = 200, description = "Coletor atribuído (ASSIGNED)", body = CollectionRequest),
        (status = 400, description = "Transição inválida"),
        (status = 404, description = "Solicitação ou coletor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_collector(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<AssignCollectorPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let request = app_state
        .collection_service
        .assign_collector(&ctx, request_id, payload.collector_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, response::ok(request)))
}

// PATCH /api/collections/{id}/start
#[utoipa::path(
    patch,
    path = "/api/collections/{id}/start",
    tag = "Collections",
    params(("id" = Uuid, Path, description = "ID da solicitação")),
    responses(
        (status = 200, description = "Coleta iniciada (IN_PROGRESS)", body = CollectionRequest),
        (status = 403, description = "Chamador não é o coletor atribuído")
    ),
    security(("api_jwt" = []))
)]
pub async fn start_collection(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Path(request_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let request = app_state
        .collection_service
        .start_collection(&ctx, request_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, response::ok(request)))
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectedItemPayload {
    pub item_id: Uuid,

    #[schema(value_type = String, example = "2.8")]
    pub actual_weight: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteCollectionPayload {
    #[validate(length(min = 1, message = "collection_items_required"))]
    pub items: Vec<CollectedItemPayload>,

    #[schema(value_type = String, example = "5.5")]
    pub total_weight: Decimal,
}

// PATCH /api/collections/{id}/complete
#[utoipa::path(
    patch,
    path = "/api/collections/{id}/complete",
    tag = "Collections",
    params(("id" = Uuid, Path, description = "ID da solicitação")),
    request_body = CompleteCollectionPayload,
    responses(
        (status = 200, description = "Coleta concluída e pedido criado", body = CollectionOutcome),
        (status = 400, description = "Pesos inválidos ou transição inválida"),
        (status = 403, description = "Chamador não é o coletor atribuído")
    ),
    security(("api_jwt" = []))
)]
pub async fn complete_collection(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<CompleteCollectionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let items = payload
        .items
        .into_iter()
        .map(|i| CollectedItem {
            item_id: i.item_id,
            actual_weight: i.actual_weight,
        })
        .collect();

    let outcome = app_state
        .collection_service
        .complete_collection(&ctx, request_id, items, payload.total_weight)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, response::ok(outcome)))
}

// PATCH /api/collections/{id}/cancel
#[utoipa::path(
    patch,
    path = "/api/collections/{id}/cancel",
    tag = "Collections",
    params(("id" = Uuid, Path, description = "ID da solicitação")),
    responses(
        (status = 200, description = "Solicitação cancelada", body = CollectionRequest),
        (status = 400, description = "Estado terminal: não cancela")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_collection(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Path(request_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let request = app_state
        .collection_service
        .cancel_request(&ctx, request_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, response::ok(request)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // As listas de itens passam pelo validador de length, que serializa os
    // elementos nos parâmetros do erro. Estes testes garantem que os dois
    // payloads de item continuam validáveis.
    #[test]
    fn create_payload_rejects_empty_item_list() {
        let payload = CreateCollectionPayload {
            customer_id: None,
            collection_address: "Rua das Acácias, 12".into(),
            collection_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            collection_time: "14:00-16:00".into(),
            promo_code: None,
            items: vec![],
        };
        let err = payload.validate().unwrap_err();
        assert!(err.field_errors().contains_key("items"));
    }

    #[test]
    fn create_payload_accepts_one_item() {
        let payload = CreateCollectionPayload {
            customer_id: None,
            collection_address: "Rua das Acácias, 12".into(),
            collection_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            collection_time: "14:00-16:00".into(),
            promo_code: None,
            items: vec![CollectionItemPayload {
                description: "Sacola de roupas brancas".into(),
                estimated_weight: Decimal::new(25, 1),
            }],
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn complete_payload_rejects_empty_item_list() {
        let payload = CompleteCollectionPayload {
            items: vec![],
            total_weight: Decimal::new(55, 1),
        };
        let err = payload.validate().unwrap_err();
        assert!(err.field_errors().contains_key("items"));

        let ok = CompleteCollectionPayload {
            items: vec![CollectedItemPayload {
                item_id: Uuid::new_v4(),
                actual_weight: Decimal::new(28, 1),
            }],
            total_weight: Decimal::new(55, 1),
        };
        assert!(ok.validate().is_ok());
    }
}
