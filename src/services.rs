pub mod auth;
pub use auth::AuthService;
pub mod tenancy_service;
pub use tenancy_service::TenancyService;
pub mod crm_service;
pub use crm_service::CrmService;
pub mod catalog_service;
pub use catalog_service::CatalogService;
pub mod collection_service;
pub use collection_service::CollectionService;
pub mod order_service;
pub use order_service::OrderService;
pub mod payment_service;
pub use payment_service::PaymentService;
pub mod notification_service;
pub use notification_service::NotificationService;
pub mod messaging;
