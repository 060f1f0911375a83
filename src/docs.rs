// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register_pressing,
        handlers::auth::register_client,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Tenancy ---
        handlers::tenancy::create_agency,
        handlers::tenancy::list_agencies,
        handlers::tenancy::set_main_agency,
        handlers::tenancy::delete_agency,
        handlers::tenancy::create_user,
        handlers::tenancy::list_users,
        handlers::tenancy::delete_user,

        // --- CRM ---
        handlers::crm::create_customer,
        handlers::crm::list_customers,
        handlers::crm::get_customer,

        // --- Catalog ---
        handlers::catalog::create_service,
        handlers::catalog::list_services,
        handlers::catalog::create_promo,
        handlers::catalog::list_promos,

        // --- Collections ---
        handlers::collections::create_collection,
        handlers::collections::list_collections,
        handlers::collections::get_collection,
        handlers::collections::assign_collector,
        handlers::collections::start_collection,
        handlers::collections::complete_collection,
        handlers::collections::cancel_collection,

        // --- Orders ---
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::update_order_status,

        // --- Payments ---
        handlers::payments::pay_order,
        handlers::payments::list_payments,
        handlers::payments::create_installment_plan,
        handlers::payments::list_installments,
        handlers::payments::pay_installment,

        // --- Notifications ---
        handlers::notifications::list_notifications,
        handlers::notifications::mark_notification_read,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterPressingPayload,
            models::auth::RegisterClientPayload,
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Tenancy ---
            models::tenancy::Tenant,
            models::tenancy::Agency,
            handlers::tenancy::CreateAgencyPayload,
            handlers::tenancy::CreateUserPayload,

            // --- CRM ---
            models::crm::Customer,
            handlers::crm::CreateCustomerPayload,

            // --- Catalog ---
            models::catalog::ServiceKind,
            models::catalog::PromoKind,
            models::catalog::ServiceOffering,
            models::catalog::Promo,
            handlers::catalog::CreateServicePayload,
            handlers::catalog::CreatePromoPayload,

            // --- Collections ---
            models::collections::CollectionStatus,
            models::collections::CollectionRequest,
            models::collections::CollectionRequestItem,
            services::collection_service::CollectionRequestDetail,
            services::collection_service::CollectionOutcome,
            handlers::collections::CollectionItemPayload,
            handlers::collections::CreateCollectionPayload,
            handlers::collections::AssignCollectorPayload,
            handlers::collections::CollectedItemPayload,
            handlers::collections::CompleteCollectionPayload,

            // --- Orders ---
            models::orders::OrderStatus,
            models::orders::PaymentStatus,
            models::orders::Order,
            models::orders::OrderItem,
            services::order_service::OrderDetail,
            handlers::orders::UpdateOrderStatusPayload,

            // --- Payments ---
            models::payments::PaymentMethod,
            models::payments::PaymentRecordStatus,
            models::payments::InstallmentStatus,
            models::payments::Payment,
            models::payments::PaymentInstallment,
            services::payment_service::InstallmentSettlement,
            handlers::payments::PayOrderPayload,
            handlers::payments::CreateInstallmentPlanPayload,
            handlers::payments::PayInstallmentPayload,

            // --- Notifications ---
            models::notifications::NotificationLevel,
            models::notifications::InternalNotification,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e cadastro"),
        (name = "Tenancy", description = "Agências e usuários do pressing"),
        (name = "CRM", description = "Gestão de clientes"),
        (name = "Catalog", description = "Serviços e promoções"),
        (name = "Collections", description = "Coletas domiciliares"),
        (name = "Orders", description = "Pedidos"),
        (name = "Payments", description = "Pagamentos e parcelamento"),
        (name = "Notifications", description = "Notificações internas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
