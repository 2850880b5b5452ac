use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Quote code, e.g. COT-2026-001
    pub code: String,
    /// Work-order code, assigned at conversion (OT-<n>)
    pub ot_code: Option<String>,
    pub client_id: Uuid,
    pub status: String,
    /// "Pendiente" until a fiscal document is issued, then "Facturado"
    pub billing_status: String,
    pub currency: String,
    /// Denormalized sum of line subtotals, tax inclusive
    pub total: Decimal,
    pub notes: Option<String>,
    pub prepress_assignee: Option<Uuid>,
    pub press_assignee: Option<Uuid>,
    pub postpress_assignee: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
