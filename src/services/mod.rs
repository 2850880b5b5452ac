pub mod audit;
pub mod clients;
pub mod inventory;
pub mod invoicing;
pub mod orders;
pub mod providers;
pub mod purchasing;
pub mod users;
