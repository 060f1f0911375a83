// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{
        CatalogRepository, CollectionRepository, CustomerRepository, NotificationRepository,
        OrderRepository, PaymentRepository, TenancyRepository, UserRepository,
    },
    services::{
        AuthService, CatalogService, CollectionService, CrmService, NotificationService,
        OrderService, PaymentService, TenancyService,
        messaging::{LogMessenger, ReceiptMessenger},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub tenancy_service: TenancyService,
    pub crm_service: CrmService,
    pub catalog_service: CatalogService,
    pub collection_service: CollectionService,
    pub order_service: OrderService,
    pub payment_service: PaymentService,
    pub notification_service: NotificationService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let tenancy_repo = TenancyRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let collection_repo = CollectionRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let notification_repo = NotificationRepository::new(db_pool.clone());

        // Provedor de recibos: só log por enquanto
        let messenger: Arc<dyn ReceiptMessenger> = Arc::new(LogMessenger);

        let notification_service =
            NotificationService::new(notification_repo, db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            tenancy_repo.clone(),
            customer_repo.clone(),
            jwt_secret,
            db_pool.clone(),
        );
        let tenancy_service =
            TenancyService::new(tenancy_repo, user_repo.clone(), db_pool.clone());
        let crm_service = CrmService::new(customer_repo.clone(), db_pool.clone());
        let catalog_service = CatalogService::new(catalog_repo.clone(), db_pool.clone());
        let order_service = OrderService::new(
            order_repo.clone(),
            customer_repo.clone(),
            notification_service.clone(),
            db_pool.clone(),
        );
        let collection_service = CollectionService::new(
            collection_repo,
            catalog_repo,
            customer_repo,
            user_repo,
            order_repo.clone(),
            notification_service.clone(),
            messenger,
            db_pool.clone(),
        );
        let payment_service = PaymentService::new(payment_repo, order_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            auth_service,
            tenancy_service,
            crm_service,
            catalog_service,
            collection_service,
            order_service,
            payment_service,
            notification_service,
        })
    }
}
