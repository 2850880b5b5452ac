pub mod audit;
pub mod clients;
pub mod common;
pub mod inventory;
pub mod invoices;
pub mod orders;
pub mod providers;
pub mod purchase_orders;
pub mod users;
