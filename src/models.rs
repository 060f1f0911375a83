pub mod auth;
pub mod tenancy;
pub mod crm;
pub mod catalog;
pub mod collections;
pub mod orders;
pub mod payments;
pub mod notifications;
