use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Work-order code this document bills; unique, one document per OT
    pub ot_code: String,
    /// "FACTURA" or "BOLETA"
    pub doc_type: String,
    /// Correlative, e.g. F001-000001
    pub number: String,
    pub client_name: String,
    pub client_tax_id: String,
    pub subtotal: Decimal,
    pub igv: Decimal,
    pub total: Decimal,
    /// Snapshot of the order's line items at issue time
    pub items: Json,
    pub issued_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
