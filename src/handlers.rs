pub mod auth;
pub mod catalog;
pub mod collections;
pub mod crm;
pub mod notifications;
pub mod orders;
pub mod payments;
pub mod tenancy;
