// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Papéis de usuário dentro de um tenant (pressing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Owner,
    Admin,
    PressingAdmin,
    Agent,
    Collector,
    Client,
}

impl Role {
    // Papéis privilegiados enxergam todas as agências do seu tenant.
    pub fn is_privileged(self) -> bool {
        matches!(
            self,
            Role::SuperAdmin | Role::Owner | Role::Admin | Role::PressingAdmin
        )
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub agency_id: Option<Uuid>,

    #[schema(example = "agente@pressing.com")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    #[schema(example = "Ana Souza")]
    pub full_name: String,
    pub phone: Option<String>,

    pub role: Role,
    pub is_active: bool,

    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Auto-cadastro de um pressing (tenant + dono + agência principal)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPressingPayload {
    #[validate(length(min = 2, message = "min_length"))]
    #[schema(example = "Pressing Net Plus")]
    pub pressing_name: String,

    #[validate(length(min = 2, message = "min_length"))]
    #[schema(example = "netplus")]
    pub subdomain: String,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "dono@pressing.com")]
    pub email: String,

    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Carlos Dias")]
    pub full_name: String,

    pub phone: Option<String>,
}

// Auto-cadastro mobile de um cliente final (usuário CLIENT + ficha de cliente)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClientPayload {
    #[validate(length(min = 2, message = "min_length"))]
    #[schema(example = "netplus")]
    pub subdomain: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Maria da Silva")]
    pub full_name: String,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "maria@email.com")]
    pub email: String,

    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,

    pub phone: Option<String>,
}

// Dados para login (e-mail é único por tenant, então o subdomínio identifica o pressing)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(length(min = 2, message = "min_length"))]
    #[schema(example = "netplus")]
    pub subdomain: String,

    #[validate(email(message = "invalid_email"))]
    pub email: String,

    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
