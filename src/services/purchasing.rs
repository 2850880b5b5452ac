use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{provider, purchase_order, purchase_order_line, stock_item};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{igv_breakdown, PurchaseOrderStatus};
use crate::services::audit::AuditService;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct PurchaseLineInput {
    pub stock_item_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePurchaseOrderInput {
    pub provider_id: Uuid,
    #[validate(length(min = 1, message = "At least one line is required"))]
    pub lines: Vec<PurchaseLineInput>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReceiveLineInput {
    pub line_id: Uuid,
    #[validate(range(min = 0, message = "Received quantity cannot be negative"))]
    pub received: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReceiveInput {
    pub lines: Vec<ReceiveLineInput>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct PurchasingService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    audit: AuditService,
}

impl PurchasingService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>, audit: AuditService) -> Self {
        Self {
            db,
            event_sender,
            audit,
        }
    }

    /// Opens a purchase order against a provider. Line totals carry IGV, so
    /// the stored total is tax-inclusive and the subtotal is derived from it.
    #[instrument(skip(self, input), fields(provider_id = %input.provider_id))]
    pub async fn create(
        &self,
        input: CreatePurchaseOrderInput,
        actor: &str,
    ) -> Result<(purchase_order::Model, Vec<purchase_order_line::Model>), ServiceError> {
        input.validate()?;
        for line in &input.lines {
            line.validate()?;
            if line.unit_price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Unit price cannot be negative".into(),
                ));
            }
        }

        let provider = provider::Entity::find_by_id(input.provider_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "Provider {} does not exist",
                    input.provider_id
                ))
            })?;

        let txn = self.db.begin().await.map_err(ServiceError::DatabaseError)?;

        // Every line must reference a live stock item before anything is written.
        let mut descriptions = HashMap::new();
        for line in &input.lines {
            let item = stock_item::Entity::find_by_id(line.stock_item_id)
                .one(&txn)
                .await
                .map_err(ServiceError::DatabaseError)?
                .ok_or_else(|| {
                    ServiceError::ValidationError(format!(
                        "Stock item {} does not exist",
                        line.stock_item_id
                    ))
                })?;
            descriptions.insert(line.stock_item_id, item.name);
        }

        let seq = purchase_order::Entity::find()
            .count(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            + 1;
        let code = format!("OC-{}-{:03}", Utc::now().format("%Y"), seq);

        let total: Decimal = input
            .lines
            .iter()
            .map(|l| l.unit_price * Decimal::from(l.quantity))
            .sum();
        let (subtotal, igv) = igv_breakdown(total);

        let po_id = Uuid::new_v4();
        let created = purchase_order::ActiveModel {
            id: Set(po_id),
            code: Set(code.clone()),
            provider_id: Set(provider.id),
            status: Set(PurchaseOrderStatus::Enviada.to_string()),
            subtotal: Set(subtotal),
            igv: Set(igv),
            total: Set(total),
            received_at: Set(None),
            reception_notes: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::DatabaseError)?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in input.lines {
            let description = descriptions
                .remove(&line.stock_item_id)
                .unwrap_or_else(|| "Artículo".to_string());
            let model = purchase_order_line::ActiveModel {
                id: Set(Uuid::new_v4()),
                purchase_order_id: Set(po_id),
                stock_item_id: Set(line.stock_item_id),
                description: Set(description),
                quantity: Set(line.quantity),
                unit_price: Set(line.unit_price),
            };
            lines.push(model.insert(&txn).await.map_err(ServiceError::DatabaseError)?);
        }

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        self.audit
            .record(
                actor,
                "ORDEN_COMPRA_CREADA",
                format!("Se emitió la orden de compra {} a {}", code, provider.name),
            )
            .await;
        self.event_sender
            .publish(Event::PurchaseOrderCreated(po_id))
            .await;

        info!(code = %code, "purchase order created");
        Ok((created, lines))
    }

    /// Books a reception. Every received quantity is checked against the
    /// ordered quantity, stock is incremented, and the order closes as
    /// `Recibida`, all in one transaction.
    #[instrument(skip(self, input), fields(purchase_order_id = %id))]
    pub async fn receive(
        &self,
        id: Uuid,
        input: ReceiveInput,
        actor: &str,
    ) -> Result<purchase_order::Model, ServiceError> {
        for line in &input.lines {
            line.validate()?;
        }

        let txn = self.db.begin().await.map_err(ServiceError::DatabaseError)?;

        let po = purchase_order::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", id)))?;

        if po.status != PurchaseOrderStatus::Enviada.to_string() {
            return Err(ServiceError::InvalidStatusTransition(format!(
                "{} is '{}'; only sent purchase orders can be received",
                po.code, po.status
            )));
        }

        let po_lines = purchase_order_line::Entity::find()
            .filter(purchase_order_line::Column::PurchaseOrderId.eq(id))
            .all(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let by_id: HashMap<Uuid, &purchase_order_line::Model> =
            po_lines.iter().map(|l| (l.id, l)).collect();

        // The same line may appear more than once in the body; the ordered
        // quantity bounds the sum, not each entry.
        let mut received_by_line: HashMap<Uuid, i32> = HashMap::new();
        for received in &input.lines {
            let line = by_id.get(&received.line_id).ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "Line {} does not belong to {}",
                    received.line_id, po.code
                ))
            })?;
            let total = received_by_line.entry(received.line_id).or_insert(0);
            *total += received.received;
            if *total > line.quantity {
                return Err(ServiceError::ValidationError(format!(
                    "{}: received {} but only {} were ordered",
                    line.description, total, line.quantity
                )));
            }
        }

        for (line_id, received) in &received_by_line {
            if *received == 0 {
                continue;
            }
            let line = by_id[line_id];
            let item = stock_item::Entity::find_by_id(line.stock_item_id)
                .one(&txn)
                .await
                .map_err(ServiceError::DatabaseError)?
                .ok_or_else(|| {
                    ServiceError::InternalError(format!(
                        "purchase line {} points at a missing stock item",
                        line.id
                    ))
                })?;
            let new_on_hand = item.on_hand + *received;
            let mut active: stock_item::ActiveModel = item.into();
            active.on_hand = Set(new_on_hand);
            active.updated_at = Set(Some(Utc::now()));
            active.update(&txn).await.map_err(ServiceError::DatabaseError)?;
        }

        let code = po.code.clone();
        let mut active: purchase_order::ActiveModel = po.into();
        active.status = Set(PurchaseOrderStatus::Recibida.to_string());
        active.received_at = Set(Some(Utc::now()));
        active.reception_notes = Set(input.notes);
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(&txn).await.map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        self.audit
            .record(
                actor,
                "RECEPCION_COMPRA",
                format!("Se recepcionó la orden de compra {}", code),
            )
            .await;
        self.event_sender
            .publish(Event::PurchaseOrderReceived(id))
            .await;

        info!(code = %code, "purchase order received");
        Ok(updated)
    }

    pub async fn get(
        &self,
        id: Uuid,
    ) -> Result<(purchase_order::Model, Vec<purchase_order_line::Model>), ServiceError> {
        let po = purchase_order::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", id)))?;
        let lines = purchase_order_line::Entity::find()
            .filter(purchase_order_line::Column::PurchaseOrderId.eq(id))
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok((po, lines))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<PurchaseOrderStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<purchase_order::Model>, u64), ServiceError> {
        let mut query = purchase_order::Entity::find();
        if let Some(status) = status {
            query = query.filter(purchase_order::Column::Status.eq(status.to_string()));
        }

        let paginator = query
            .order_by_desc(purchase_order::Column::CreatedAt)
            .paginate(&*self.db, per_page);
        let total = paginator.num_items().await.map_err(ServiceError::DatabaseError)?;
        let orders = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((orders, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_order_requires_at_least_one_line() {
        let input = CreatePurchaseOrderInput {
            provider_id: Uuid::new_v4(),
            lines: vec![],
        };
        assert!(input.validate().is_err());

        let input = CreatePurchaseOrderInput {
            provider_id: Uuid::new_v4(),
            lines: vec![PurchaseLineInput {
                stock_item_id: Uuid::new_v4(),
                quantity: 5,
                unit_price: Decimal::ONE,
            }],
        };
        assert!(input.validate().is_ok());
    }
}
