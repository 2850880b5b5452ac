pub mod audit_log;
pub mod client;
pub mod invoice;
pub mod order;
pub mod order_item;
pub mod provider;
pub mod purchase_order;
pub mod purchase_order_line;
pub mod stock_item;
pub mod user;
