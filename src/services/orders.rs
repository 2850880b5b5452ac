use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{client, order, order_item, user};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{is_valid_transition, BillingStatus, OrderStatus, Stage, UserRole};
use crate::services::audit::AuditService;

const CURRENCY: &str = "S/";

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct OrderItemInput {
    #[validate(length(min = 1, max = 200, message = "Product is required"))]
    pub product: String,
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: i32,
    pub specs: Option<String>,
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderInput {
    pub client_id: Uuid,
    #[validate(length(min = 1, message = "At least one line item is required"))]
    pub items: Vec<OrderItemInput>,
    pub notes: Option<String>,
}

/// The tabs of the order board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderTab {
    Quotes,
    Production,
    Completed,
    Rejected,
}

impl OrderTab {
    fn statuses(&self) -> Vec<OrderStatus> {
        use OrderStatus::*;
        match self {
            OrderTab::Quotes => vec![Nueva, EnNegociacion],
            OrderTab::Production => vec![
                OrdenCreada,
                DisenoPendiente,
                EnDiseno,
                EnAprobacionCliente,
                CambiosSolicitados,
                DisenoAprobado,
                AsignadaAPrensa,
                EnPreparacion,
                Imprimiendo,
                EnPostPrensa,
                EnAcabados,
                EnControlDeCalidad,
            ],
            OrderTab::Completed => vec![Completado],
            OrderTab::Rejected => vec![Rechazada, Cancelada],
        }
    }
}

/// Order counts per board tab, for the dashboard cards.
#[derive(Debug, Serialize)]
pub struct OrderBoardSummary {
    pub quotes: u64,
    pub production: u64,
    pub completed: u64,
    pub rejected: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub search: Option<String>,
    pub tab: Option<OrderTab>,
}

#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    audit: AuditService,
}

fn parse_status(raw: &str) -> Result<OrderStatus, ServiceError> {
    OrderStatus::from_str(raw)
        .map_err(|_| ServiceError::InternalError(format!("unknown order status '{}'", raw)))
}

impl OrderService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>, audit: AuditService) -> Self {
        Self {
            db,
            event_sender,
            audit,
        }
    }

    /// Creates a quote in `Nueva` with its line items, computing every
    /// subtotal and the order total server-side.
    #[instrument(skip(self, input), fields(client_id = %input.client_id))]
    pub async fn create(
        &self,
        input: CreateOrderInput,
        actor: &str,
    ) -> Result<(order::Model, Vec<order_item::Model>), ServiceError> {
        input.validate()?;
        for item in &input.items {
            item.validate()?;
            if item.unit_price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Unit price cannot be negative".into(),
                ));
            }
        }

        let client = client::Entity::find_by_id(input.client_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::ValidationError(format!("Client {} does not exist", input.client_id))
            })?;

        let txn = self.db.begin().await.map_err(ServiceError::DatabaseError)?;

        let seq = order::Entity::find()
            .count(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            + 1;
        let code = format!("COT-{}-{:04}", Utc::now().format("%Y"), seq);

        let total: Decimal = input
            .items
            .iter()
            .map(|i| i.unit_price * Decimal::from(i.quantity))
            .sum();

        let order_id = Uuid::new_v4();
        let now = Utc::now();
        let order_model = order::ActiveModel {
            id: Set(order_id),
            code: Set(code.clone()),
            ot_code: Set(None),
            client_id: Set(client.id),
            status: Set(OrderStatus::Nueva.to_string()),
            billing_status: Set(BillingStatus::Pendiente.to_string()),
            currency: Set(CURRENCY.to_string()),
            total: Set(total),
            notes: Set(input.notes),
            prepress_assignee: Set(None),
            press_assignee: Set(None),
            postpress_assignee: Set(None),
            created_at: Set(now),
            updated_at: Set(None),
        };
        let created = order_model.insert(&txn).await.map_err(|e| {
            error!("failed to insert order: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        let mut items = Vec::with_capacity(input.items.len());
        for item in input.items {
            let subtotal = item.unit_price * Decimal::from(item.quantity);
            let model = order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                product: Set(item.product),
                quantity: Set(item.quantity),
                specs: Set(item.specs),
                unit_price: Set(item.unit_price),
                subtotal: Set(subtotal),
            };
            items.push(model.insert(&txn).await.map_err(ServiceError::DatabaseError)?);
        }

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        self.audit
            .record(
                actor,
                "COTIZACION_CREADA",
                format!("Se creó la cotización {} para {}", code, client.legal_name),
            )
            .await;
        self.event_sender.publish(Event::OrderCreated(order_id)).await;

        info!(order_id = %order_id, code = %code, "quote created");
        Ok((created, items))
    }

    pub async fn get(&self, id: Uuid) -> Result<order::Model, ServiceError> {
        order::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", id)))
    }

    pub async fn get_items(&self, id: Uuid) -> Result<Vec<order_item::Model>, ServiceError> {
        order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(id))
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, filter))]
    pub async fn list(
        &self,
        filter: OrderFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<order::Model>, u64), ServiceError> {
        let mut condition = Condition::all();

        if let Some(tab) = filter.tab {
            let statuses: Vec<String> = tab.statuses().iter().map(|s| s.to_string()).collect();
            condition = condition.add(order::Column::Status.is_in(statuses));
        }

        if let Some(search) = filter.search.filter(|s| !s.trim().is_empty()) {
            let term = search.trim().to_string();
            let mut any = Condition::any()
                .add(order::Column::Code.contains(&term))
                .add(order::Column::OtCode.contains(&term));
            // Match by client name the way the board search does
            let client_ids: Vec<Uuid> = client::Entity::find()
                .filter(client::Column::LegalName.contains(&term))
                .all(&*self.db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .into_iter()
                .map(|c| c.id)
                .collect();
            if !client_ids.is_empty() {
                any = any.add(order::Column::ClientId.is_in(client_ids));
            }
            condition = condition.add(any);
        }

        let paginator = order::Entity::find()
            .filter(condition)
            .order_by_desc(order::Column::CreatedAt)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await.map_err(ServiceError::DatabaseError)?;
        let orders = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((orders, total))
    }

    /// Converts an active quote into a work order, allocating its OT code.
    /// Preconditions are re-checked here so a direct call cannot convert a
    /// client-less or empty quote; nothing is mutated on failure.
    #[instrument(skip(self))]
    pub async fn convert_to_ot(&self, id: Uuid, actor: &str) -> Result<order::Model, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::DatabaseError)?;

        let order = order::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", id)))?;

        let status = parse_status(&order.status)?;
        if !status.is_active_quote() {
            return Err(ServiceError::InvalidStatusTransition(format!(
                "Only an active quote can be converted, {} is '{}'",
                order.code, order.status
            )));
        }

        let client_exists = client::Entity::find_by_id(order.client_id)
            .count(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            > 0;
        if !client_exists {
            return Err(ServiceError::ValidationError(format!(
                "Quote {} has no client on file",
                order.code
            )));
        }

        let item_count = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(id))
            .count(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if item_count == 0 {
            return Err(ServiceError::ValidationError(format!(
                "Quote {} has no line items",
                order.code
            )));
        }

        let seq = order::Entity::find()
            .filter(order::Column::OtCode.is_not_null())
            .count(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            + 1;
        let ot_code = format!("OT-{:04}", seq);

        let order_id = order.id;
        let mut active: order::ActiveModel = order.into();
        active.ot_code = Set(Some(ot_code.clone()));
        active.status = Set(OrderStatus::OrdenCreada.to_string());
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(&txn).await.map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        self.audit
            .record(
                actor,
                "OT_CREADA",
                format!("La cotización {} pasó a producción como {}", updated.code, ot_code),
            )
            .await;
        self.event_sender
            .publish(Event::OrderConverted {
                order_id,
                ot_code: ot_code.clone(),
            })
            .await;

        info!(order_id = %order_id, ot_code = %ot_code, "quote converted to work order");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn reject_quote(&self, id: Uuid, actor: &str) -> Result<order::Model, ServiceError> {
        let updated = self
            .transition(id, OrderStatus::Rechazada, actor)
            .await?;
        self.event_sender.publish(Event::QuoteRejected(id)).await;
        Ok(updated)
    }

    /// Table-checked status transition for the day-to-day production moves.
    /// Conversion, rejection and (un)assignment have dedicated operations.
    #[instrument(skip(self), fields(order_id = %id, new_status = %new_status))]
    pub async fn transition(
        &self,
        id: Uuid,
        new_status: OrderStatus,
        actor: &str,
    ) -> Result<order::Model, ServiceError> {
        // Conversion allocates the OT code and rejection is terminal for the
        // quote; both go through their own operations, not this endpoint.
        match new_status {
            OrderStatus::OrdenCreada => {
                return Err(ServiceError::ValidationError(
                    "A quote enters production through conversion".into(),
                ))
            }
            OrderStatus::Rechazada => {
                return Err(ServiceError::ValidationError(
                    "A quote is turned down through rejection".into(),
                ))
            }
            _ => {}
        }

        let order = self.get(id).await?;
        let old_status = parse_status(&order.status)?;

        if !is_valid_transition(old_status, new_status) {
            error!(
                "invalid status transition from '{}' to '{}'",
                old_status, new_status
            );
            return Err(ServiceError::InvalidStatusTransition(format!(
                "Cannot transition from '{}' to '{}'",
                old_status, new_status
            )));
        }

        let mut active: order::ActiveModel = order.into();
        active.status = Set(new_status.to_string());
        active.updated_at = Set(Some(Utc::now()));
        let updated = active
            .update(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.audit
            .record(
                actor,
                "ORDEN_ESTADO",
                format!("{}: '{}' -> '{}'", updated.code, old_status, new_status),
            )
            .await;
        self.event_sender
            .publish(Event::OrderStatusChanged {
                order_id: id,
                from: old_status,
                to: new_status,
            })
            .await;

        info!("order {} moved from '{}' to '{}'", id, old_status, new_status);
        Ok(updated)
    }

    /// Assigns a production user; their role picks the stage and the entry
    /// status the order moves into.
    #[instrument(skip(self))]
    pub async fn assign(
        &self,
        id: Uuid,
        user_id: Uuid,
        actor: &str,
    ) -> Result<order::Model, ServiceError> {
        let assignee = user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))?;

        let role = UserRole::from_str(&assignee.role)
            .map_err(|_| ServiceError::InternalError(format!("unknown role '{}'", assignee.role)))?;
        let entry_status = role.assignment_entry_status().ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "Role '{}' does not take production assignments",
                assignee.role
            ))
        })?;

        let order = self.get(id).await?;
        let old_status = parse_status(&order.status)?;
        if !is_valid_transition(old_status, entry_status) {
            return Err(ServiceError::InvalidStatusTransition(format!(
                "Cannot assign {} while the order is '{}'",
                assignee.name, old_status
            )));
        }

        let mut active: order::ActiveModel = order.into();
        match entry_status.stage() {
            Stage::PrePress => active.prepress_assignee = Set(Some(user_id)),
            Stage::Press => active.press_assignee = Set(Some(user_id)),
            Stage::PostPress => active.postpress_assignee = Set(Some(user_id)),
            _ => unreachable!("entry statuses always map to a production stage"),
        }
        active.status = Set(entry_status.to_string());
        active.updated_at = Set(Some(Utc::now()));
        let updated = active
            .update(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.audit
            .record(
                actor,
                "OT_ASIGNADA",
                format!(
                    "{} asignada a {} ({})",
                    updated.ot_code.as_deref().unwrap_or(&updated.code),
                    assignee.name,
                    assignee.role
                ),
            )
            .await;
        self.event_sender
            .publish(Event::OrderAssigned {
                order_id: id,
                assignee: user_id,
            })
            .await;

        Ok(updated)
    }

    /// Withdraws the current assignment; the order returns to the backlog.
    #[instrument(skip(self))]
    pub async fn unassign(&self, id: Uuid, actor: &str) -> Result<order::Model, ServiceError> {
        let order = self.get(id).await?;
        let status = parse_status(&order.status)?;

        if !status.is_stage_entry() {
            return Err(ServiceError::InvalidStatusTransition(format!(
                "Cannot withdraw an assignment while the order is '{}'",
                status
            )));
        }

        let mut active: order::ActiveModel = order.into();
        match status.stage() {
            Stage::PrePress => active.prepress_assignee = Set(None),
            Stage::Press => active.press_assignee = Set(None),
            Stage::PostPress => active.postpress_assignee = Set(None),
            _ => unreachable!("stage entry statuses map to a production stage"),
        }
        active.status = Set(OrderStatus::OrdenCreada.to_string());
        active.updated_at = Set(Some(Utc::now()));
        let updated = active
            .update(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.audit
            .record(
                actor,
                "OT_DESASIGNADA",
                format!(
                    "{} volvió a la cola de pendientes",
                    updated.ot_code.as_deref().unwrap_or(&updated.code)
                ),
            )
            .await;
        self.event_sender.publish(Event::OrderUnassigned(id)).await;

        Ok(updated)
    }

    /// Work queue for one production stage, oldest first.
    #[instrument(skip(self))]
    pub async fn stage_queue(
        &self,
        stage: Stage,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<order::Model>, u64), ServiceError> {
        use strum::IntoEnumIterator;
        let statuses: Vec<String> = OrderStatus::iter()
            .filter(|s| s.stage() == stage)
            .map(|s| s.to_string())
            .collect();

        let paginator = order::Entity::find()
            .filter(order::Column::Status.is_in(statuses))
            .order_by_asc(order::Column::CreatedAt)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await.map_err(ServiceError::DatabaseError)?;
        let orders = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((orders, total))
    }

    async fn count_tab(&self, tab: OrderTab) -> Result<u64, ServiceError> {
        let statuses: Vec<String> = tab.statuses().iter().map(|s| s.to_string()).collect();
        order::Entity::find()
            .filter(order::Column::Status.is_in(statuses))
            .count(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn summary(&self) -> Result<OrderBoardSummary, ServiceError> {
        Ok(OrderBoardSummary {
            quotes: self.count_tab(OrderTab::Quotes).await?,
            production: self.count_tab(OrderTab::Production).await?,
            completed: self.count_tab(OrderTab::Completed).await?,
            rejected: self.count_tab(OrderTab::Rejected).await?,
        })
    }
}
