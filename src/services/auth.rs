// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, TenancyRepository, UserRepository},
    middleware::auth::TenantContext,
    models::auth::{
        AuthResponse, Claims, LoginPayload, RegisterClientPayload, RegisterPressingPayload, Role,
        User,
    },
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    tenancy_repo: TenancyRepository,
    customer_repo: CustomerRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        tenancy_repo: TenancyRepository,
        customer_repo: CustomerRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            tenancy_repo,
            customer_repo,
            jwt_secret,
            pool,
        }
    }

    // Auto-cadastro de um pressing: tenant + agência principal + dono,
    // tudo ou nada dentro de uma transação.
    pub async fn register_pressing(
        &self,
        payload: RegisterPressingPayload,
    ) -> Result<AuthResponse, AppError> {
        let hashed_password = Self::hash_password(payload.password).await?;

        let mut tx = self.pool.begin().await?;

        let tenant = self
            .tenancy_repo
            .create_tenant(
                &mut *tx,
                &payload.pressing_name,
                &payload.subdomain,
                payload.phone.as_deref(),
            )
            .await?;

        // A primeira agência nasce como principal
        let agency = self
            .tenancy_repo
            .create_agency(&mut *tx, tenant.id, "Agência Principal", "MAIN", None, true)
            .await?;

        let owner = self
            .user_repo
            .create_user(
                &mut *tx,
                tenant.id,
                Some(agency.id),
                &payload.email,
                &hashed_password,
                &payload.full_name,
                payload.phone.as_deref(),
                Role::Owner,
            )
            .await?;

        tx.commit().await?;

        tracing::info!("🏢 Novo pressing cadastrado: {}", tenant.subdomain);

        let token = self.create_token(owner.id)?;
        Ok(AuthResponse { token, user: owner })
    }

    // Auto-cadastro mobile: usuário CLIENT + ficha de cliente vinculada.
    pub async fn register_client(
        &self,
        payload: RegisterClientPayload,
    ) -> Result<AuthResponse, AppError> {
        let tenant = self
            .tenancy_repo
            .find_tenant_by_subdomain(&payload.subdomain)
            .await?
            .ok_or(AppError::NotFound("tenant_not_found"))?;

        let hashed_password = Self::hash_password(payload.password).await?;

        let mut tx = self.pool.begin().await?;

        let user = self
            .user_repo
            .create_user(
                &mut *tx,
                tenant.id,
                None,
                &payload.email,
                &hashed_password,
                &payload.full_name,
                payload.phone.as_deref(),
                Role::Client,
            )
            .await?;

        self.customer_repo
            .create(
                &mut *tx,
                tenant.id,
                None,
                Some(user.id),
                &payload.full_name,
                Some(&payload.email),
                payload.phone.as_deref(),
                None,
            )
            .await?;

        tx.commit().await?;

        let token = self.create_token(user.id)?;
        Ok(AuthResponse { token, user })
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<AuthResponse, AppError> {
        let tenant = self
            .tenancy_repo
            .find_tenant_by_subdomain(&payload.subdomain)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_email(&self.pool, tenant.id, &payload.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AppError::InvalidCredentials);
        }

        let password = payload.password;
        let password_hash = user.password_hash.clone();

        // Verificação de bcrypt fora do runtime async
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password, &password_hash))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(user.id)?;
        Ok(AuthResponse { token, user })
    }

    // Resolve o contexto do tenant a partir do bearer token. Leitura pura:
    // nenhum efeito colateral acontece aqui.
    pub async fn resolve_context(&self, token: &str) -> Result<TenantContext, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user: User = self
            .user_repo
            .find_active_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !user.is_active {
            return Err(AppError::UserNotFound);
        }

        Ok(TenantContext {
            user_id: user.id,
            tenant_id: user.tenant_id,
            agency_id: user.agency_id,
            role: user.role,
        })
    }

    pub async fn current_user(&self, ctx: &TenantContext) -> Result<User, AppError> {
        self.user_repo
            .find_active_by_id(ctx.user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    async fn hash_password(password: String) -> Result<String, AppError> {
        let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
