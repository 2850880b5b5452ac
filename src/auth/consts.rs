//! Permission string constants used when wiring routes.

pub const USERS_MANAGE: &str = "users:manage";
pub const PROVIDERS_MANAGE: &str = "providers:manage";
pub const CLIENTS_MANAGE: &str = "clients:manage";
pub const ORDERS_MANAGE: &str = "orders:manage";
pub const PRODUCTION_MANAGE: &str = "production:manage";
pub const INVENTORY_MANAGE: &str = "inventory:manage";
pub const INVOICES_MANAGE: &str = "invoices:manage";
pub const AUDIT_READ: &str = "audit:read";
