use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::stock_item;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::audit::AuditService;

#[derive(Debug, Deserialize, Validate)]
pub struct StockItemInput {
    /// Left blank, a SKU is derived from the category.
    pub sku: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, max = 1, message = "ABC class must be A, B or C"))]
    pub abc_class: String,
    pub unit_price: Decimal,
    #[validate(range(min = 0, message = "On-hand quantity cannot be negative"))]
    pub on_hand: i32,
    #[validate(range(min = 0, message = "Minimum level cannot be negative"))]
    pub min_level: i32,
}

/// Stock counts for the dashboard cards.
#[derive(Debug, Serialize)]
pub struct StockSummary {
    pub total_items: u64,
    pub low_stock: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct StockFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    /// When true, only items under their minimum level.
    pub low: Option<bool>,
}

#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    audit: AuditService,
}

/// SKU shape: first three letters of the category, a dash, four digits.
fn generate_sku(category: &str) -> String {
    let prefix: String = category
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase();
    let prefix = if prefix.is_empty() { "ART".to_string() } else { prefix };
    let suffix: u32 = rand::thread_rng().gen_range(1000..10000);
    format!("{}-{}", prefix, suffix)
}

impl InventoryService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>, audit: AuditService) -> Self {
        Self {
            db,
            event_sender,
            audit,
        }
    }

    async fn sku_taken(&self, sku: &str, exclude: Option<Uuid>) -> Result<bool, ServiceError> {
        let mut query =
            stock_item::Entity::find().filter(stock_item::Column::Sku.eq(sku.to_string()));
        if let Some(id) = exclude {
            query = query.filter(stock_item::Column::Id.ne(id));
        }
        let count = query.count(&*self.db).await.map_err(ServiceError::DatabaseError)?;
        Ok(count > 0)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(
        &self,
        input: StockItemInput,
        actor: &str,
    ) -> Result<stock_item::Model, ServiceError> {
        input.validate()?;
        self.check_price_and_class(&input)?;

        let sku = match input.sku.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(explicit) => {
                if self.sku_taken(explicit, None).await? {
                    return Err(ServiceError::Conflict(format!(
                        "SKU {} is already in use",
                        explicit
                    )));
                }
                explicit.to_string()
            }
            None => {
                let mut candidate = generate_sku(&input.category);
                while self.sku_taken(&candidate, None).await? {
                    candidate = generate_sku(&input.category);
                }
                candidate
            }
        };

        let item = stock_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            sku: Set(sku.clone()),
            name: Set(input.name.clone()),
            category: Set(input.category),
            abc_class: Set(input.abc_class.to_uppercase()),
            unit_price: Set(input.unit_price),
            on_hand: Set(input.on_hand),
            min_level: Set(input.min_level),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::DatabaseError)?;

        self.audit
            .record(
                actor,
                "PRODUCTO_CREADO",
                format!("Se registró el producto {} ({})", input.name, sku),
            )
            .await;
        self.event_sender.publish(Event::StockItemCreated(item.id)).await;

        info!(sku = %sku, "stock item created");
        Ok(item)
    }

    #[instrument(skip(self, input), fields(stock_item_id = %id))]
    pub async fn update(
        &self,
        id: Uuid,
        input: StockItemInput,
        actor: &str,
    ) -> Result<stock_item::Model, ServiceError> {
        input.validate()?;
        self.check_price_and_class(&input)?;

        let existing = self.get(id).await?;
        let sku = match input.sku.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(explicit) => {
                if self.sku_taken(explicit, Some(id)).await? {
                    return Err(ServiceError::Conflict(format!(
                        "SKU {} is already in use",
                        explicit
                    )));
                }
                explicit.to_string()
            }
            None => existing.sku.clone(),
        };

        let mut active: stock_item::ActiveModel = existing.into();
        active.sku = Set(sku.clone());
        active.name = Set(input.name.clone());
        active.category = Set(input.category);
        active.abc_class = Set(input.abc_class.to_uppercase());
        active.unit_price = Set(input.unit_price);
        active.on_hand = Set(input.on_hand);
        active.min_level = Set(input.min_level);
        active.updated_at = Set(Some(Utc::now()));
        let updated = active
            .update(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.audit
            .record(
                actor,
                "PRODUCTO_EDITADO",
                format!("Se actualizó el producto {} ({})", input.name, sku),
            )
            .await;
        self.event_sender.publish(Event::StockItemUpdated(id)).await;

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid, actor: &str) -> Result<(), ServiceError> {
        let item = self.get(id).await?;
        stock_item::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await
            .map_err(|_| {
                ServiceError::Conflict(format!(
                    "{} is referenced by purchase orders and cannot be deleted",
                    item.sku
                ))
            })?;

        self.audit
            .record(
                actor,
                "PRODUCTO_ELIMINADO",
                format!("Se eliminó el producto {} ({})", item.name, item.sku),
            )
            .await;
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<stock_item::Model, ServiceError> {
        stock_item::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Stock item {} not found", id)))
    }

    #[instrument(skip(self, filter))]
    pub async fn list(
        &self,
        filter: StockFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<stock_item::Model>, u64), ServiceError> {
        let mut condition = Condition::all();

        if let Some(term) = filter.search.filter(|s| !s.trim().is_empty()) {
            let term = term.trim().to_string();
            condition = condition.add(
                Condition::any()
                    .add(stock_item::Column::Name.contains(&term))
                    .add(stock_item::Column::Sku.contains(&term)),
            );
        }
        if let Some(category) = filter.category.filter(|c| !c.trim().is_empty()) {
            condition = condition.add(stock_item::Column::Category.eq(category.trim().to_string()));
        }
        if filter.low.unwrap_or(false) {
            condition = condition.add(
                Expr::col(stock_item::Column::OnHand).lt(Expr::col(stock_item::Column::MinLevel)),
            );
        }

        let paginator = stock_item::Entity::find()
            .filter(condition)
            .order_by_asc(stock_item::Column::Name)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await.map_err(ServiceError::DatabaseError)?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((items, total))
    }

    pub async fn summary(&self) -> Result<StockSummary, ServiceError> {
        let total_items = stock_item::Entity::find()
            .count(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let low_stock = stock_item::Entity::find()
            .filter(
                Expr::col(stock_item::Column::OnHand).lt(Expr::col(stock_item::Column::MinLevel)),
            )
            .count(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(StockSummary {
            total_items,
            low_stock,
        })
    }

    fn check_price_and_class(&self, input: &StockItemInput) -> Result<(), ServiceError> {
        if input.unit_price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Unit price cannot be negative".into(),
            ));
        }
        if !matches!(input.abc_class.to_uppercase().as_str(), "A" | "B" | "C") {
            return Err(ServiceError::ValidationError(
                "ABC class must be A, B or C".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_sku_uses_category_prefix() {
        let sku = generate_sku("Papel Couché");
        assert!(sku.starts_with("PAP-"));
        assert_eq!(sku.len(), 8);
    }

    #[test]
    fn generated_sku_falls_back_on_odd_categories() {
        let sku = generate_sku("---");
        assert!(sku.starts_with("ART-"));
    }
}
