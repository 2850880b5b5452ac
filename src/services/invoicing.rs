use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{client, invoice, order, order_item};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{igv_breakdown, BillingStatus, FiscalDocType, OrderStatus};
use crate::services::audit::AuditService;

#[derive(Debug, Deserialize, Validate)]
pub struct IssueDocumentInput {
    #[validate(length(min = 1, message = "Work order code is required"))]
    pub ot_code: String,
    pub doc_type: FiscalDocType,
}

#[derive(Clone)]
pub struct InvoicingService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    audit: AuditService,
}

impl InvoicingService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>, audit: AuditService) -> Self {
        Self {
            db,
            event_sender,
            audit,
        }
    }

    /// Issues the fiscal document for a completed work order. The correlative
    /// is allocated inside the same transaction that writes the document, and
    /// the order's billing status flips to `Facturado` with it.
    #[instrument(skip(self, input), fields(ot_code = %input.ot_code))]
    pub async fn issue(
        &self,
        input: IssueDocumentInput,
        actor: &str,
    ) -> Result<invoice::Model, ServiceError> {
        input.validate()?;
        let ot_code = input.ot_code.trim().to_string();

        let txn = self.db.begin().await.map_err(ServiceError::DatabaseError)?;

        let order = order::Entity::find()
            .filter(order::Column::OtCode.eq(ot_code.clone()))
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Work order {} not found", ot_code)))?;

        let status = OrderStatus::from_str(&order.status)
            .map_err(|_| ServiceError::InternalError(format!("unknown order status '{}'", order.status)))?;
        if status != OrderStatus::Completado {
            return Err(ServiceError::ValidationError(format!(
                "{} is '{}'; only completed work orders can be billed",
                ot_code, order.status
            )));
        }

        if let Some(existing) = invoice::Entity::find()
            .filter(invoice::Column::OtCode.eq(ot_code.clone()))
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
        {
            warn!(number = %existing.number, "work order already billed");
            return Err(ServiceError::Conflict(format!(
                "{} is already billed under {}",
                ot_code, existing.number
            )));
        }

        let client = client::Entity::find_by_id(order.client_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::InternalError(format!("order {} has no client row", order.code))
            })?;

        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order.id))
            .all(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let items_snapshot = json!(items
            .iter()
            .map(|i| {
                json!({
                    "product": i.product,
                    "quantity": i.quantity,
                    "unit_price": i.unit_price,
                    "subtotal": i.subtotal,
                })
            })
            .collect::<Vec<_>>());

        let seq = invoice::Entity::find()
            .filter(invoice::Column::DocType.eq(input.doc_type.to_string()))
            .count(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            + 1;
        let number = input.doc_type.correlative(seq);

        let (subtotal, igv) = igv_breakdown(order.total);

        let issued = invoice::ActiveModel {
            id: Set(Uuid::new_v4()),
            ot_code: Set(ot_code.clone()),
            doc_type: Set(input.doc_type.to_string()),
            number: Set(number.clone()),
            client_name: Set(client.legal_name),
            client_tax_id: Set(client.tax_id),
            subtotal: Set(subtotal),
            igv: Set(igv),
            total: Set(order.total),
            items: Set(items_snapshot),
            issued_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::DatabaseError)?;

        let mut order_active: order::ActiveModel = order.into();
        order_active.billing_status = Set(BillingStatus::Facturado.to_string());
        order_active.updated_at = Set(Some(Utc::now()));
        order_active
            .update(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        self.audit
            .record(
                actor,
                "DOCUMENTO_EMITIDO",
                format!("Se emitió {} {} para {}", input.doc_type, number, ot_code),
            )
            .await;
        self.event_sender
            .publish(Event::InvoiceIssued {
                ot_code: ot_code.clone(),
                number: number.clone(),
            })
            .await;

        info!(number = %number, "fiscal document issued");
        Ok(issued)
    }

    pub async fn get(&self, id: Uuid) -> Result<invoice::Model, ServiceError> {
        invoice::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Document {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        search: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<invoice::Model>, u64), ServiceError> {
        let mut query = invoice::Entity::find();
        if let Some(term) = search.filter(|s| !s.trim().is_empty()) {
            let term = term.trim().to_string();
            query = query.filter(
                sea_orm::Condition::any()
                    .add(invoice::Column::Number.contains(&term))
                    .add(invoice::Column::OtCode.contains(&term))
                    .add(invoice::Column::ClientName.contains(&term)),
            );
        }

        let paginator = query
            .order_by_desc(invoice::Column::IssuedAt)
            .paginate(&*self.db, per_page);
        let total = paginator.num_items().await.map_err(ServiceError::DatabaseError)?;
        let invoices = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((invoices, total))
    }
}
