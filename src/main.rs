//src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register_pressing))
        .route("/register-client", post(handlers::auth::register_client))
        .route("/login", post(handlers::auth::login));

    let tenancy_routes = Router::new()
        .route(
            "/agencies",
            post(handlers::tenancy::create_agency).get(handlers::tenancy::list_agencies),
        )
        .route("/agencies/{id}/main", patch(handlers::tenancy::set_main_agency))
        .route("/agencies/{id}", axum::routing::delete(handlers::tenancy::delete_agency))
        .route(
            "/users",
            post(handlers::tenancy::create_user).get(handlers::tenancy::list_users),
        )
        .route("/users/me", get(handlers::auth::get_me))
        .route("/users/{id}", axum::routing::delete(handlers::tenancy::delete_user));

    let crm_routes = Router::new()
        .route(
            "/customers",
            post(handlers::crm::create_customer).get(handlers::crm::list_customers),
        )
        .route("/customers/{id}", get(handlers::crm::get_customer));

    let catalog_routes = Router::new()
        .route(
            "/services",
            post(handlers::catalog::create_service).get(handlers::catalog::list_services),
        )
        .route(
            "/promos",
            post(handlers::catalog::create_promo).get(handlers::catalog::list_promos),
        );

    let collection_routes = Router::new()
        .route(
            "/collections",
            post(handlers::collections::create_collection)
                .get(handlers::collections::list_collections),
        )
        .route("/collections/{id}", get(handlers::collections::get_collection))
        .route(
            "/collections/{id}/assign",
            patch(handlers::collections::assign_collector),
        )
        .route(
            "/collections/{id}/start",
            patch(handlers::collections::start_collection),
        )
        .route(
            "/collections/{id}/complete",
            patch(handlers::collections::complete_collection),
        )
        .route(
            "/collections/{id}/cancel",
            patch(handlers::collections::cancel_collection),
        );

    let order_routes = Router::new()
        .route("/orders", get(handlers::orders::list_orders))
        .route("/orders/{id}", get(handlers::orders::get_order))
        .route("/orders/{id}/status", patch(handlers::orders::update_order_status))
        .route(
            "/orders/{id}/payments",
            post(handlers::payments::pay_order).get(handlers::payments::list_payments),
        )
        .route(
            "/orders/{id}/installments",
            post(handlers::payments::create_installment_plan)
                .get(handlers::payments::list_installments),
        )
        .route(
            "/installments/{id}/pay",
            post(handlers::payments::pay_installment),
        );

    let notification_routes = Router::new()
        .route("/notifications", get(handlers::notifications::list_notifications))
        .route(
            "/notifications/{id}/read",
            patch(handlers::notifications::mark_notification_read),
        );

    // Tudo que não é auth passa pelo guardião de tenant
    let protected_routes = Router::new()
        .merge(tenancy_routes)
        .merge(crm_routes)
        .merge(catalog_routes)
        .merge(collection_routes)
        .merge(order_routes)
        .merge(notification_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
