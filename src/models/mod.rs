pub mod fiscal;
pub mod order_status;
pub mod person_kind;
pub mod purchase_order_status;
pub mod roles;

pub use fiscal::{igv_breakdown, BillingStatus, FiscalDocType, IGV_RATE};
pub use order_status::{is_valid_transition, OrderStatus, Stage};
pub use person_kind::PersonKind;
pub use purchase_order_status::PurchaseOrderStatus;
pub use roles::{Presence, UserRole};
