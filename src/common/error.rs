// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

use crate::common::i18n::{self, DEFAULT_LOCALE};
use crate::middleware::i18n::Locale;

// Taxonomia de erros do domínio, com `thiserror` para melhor ergonomia.
// Cada variante carrega um código estável; a mensagem localizada é
// resolvida na borda HTTP (to_api_error).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Não autenticado")]
    Unauthenticated,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // Recurso ausente ou fora do escopo do chamador (código i18n)
    #[error("Recurso não encontrado: {0}")]
    NotFound(&'static str),

    // Violação de unicidade ou pré-condição de negócio (código i18n)
    #[error("Conflito: {0}")]
    Conflict(&'static str),

    #[error("Parcela já quitada")]
    AlreadySettled,

    #[error("Transição de estado inválida: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    // Entrada rejeitada por regra de negócio (código i18n)
    #[error("Entrada inválida: {0}")]
    InvalidInput(&'static str),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    // (status HTTP, código de mensagem)
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found"),
            AppError::NotFound(code) => (StatusCode::NOT_FOUND, code),
            // Conflitos viram 400 na nossa API (não 409)
            AppError::Conflict(code) => (StatusCode::BAD_REQUEST, code),
            AppError::AlreadySettled => (StatusCode::BAD_REQUEST, "installment_already_settled"),
            AppError::InvalidTransition { .. } => (StatusCode::BAD_REQUEST, "invalid_transition"),
            AppError::InvalidInput(code) => (StatusCode::BAD_REQUEST, code),
            // Todos os outros viram 500 com mensagem genérica; o detalhe
            // fica no log do servidor, nunca na resposta.
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }

    // Converte para o erro de borda HTTP, resolvendo a mensagem no locale
    // do chamador. Erros 500 são logados aqui.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let (status, code) = self.status_and_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro interno do servidor: {}", self);
        }

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut map = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| json!(m.to_string())))
                        .collect();
                    map.insert(field.to_string(), Value::Array(messages));
                }
                Some(Value::Object(map))
            }
            AppError::InvalidTransition { from, to } => {
                Some(json!({ "from": from, "to": to }))
            }
            _ => None,
        };

        ApiError {
            status,
            error: i18n::translate(&locale.0, code).to_string(),
            details,
        }
    }
}

// Erro já pronto para virar resposta HTTP no envelope padrão.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": self.error,
            "details": self.details,
        }));
        (self.status, body).into_response()
    }
}

// Usado como rejeição de middlewares/extratores, onde não há Locale.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale(DEFAULT_LOCALE.to_string()))
            .into_response()
    }
}
