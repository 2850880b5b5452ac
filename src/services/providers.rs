use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use serde::Deserialize;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::provider;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::audit::AuditService;

static RUC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{11}$").expect("valid RUC regex"));

fn validate_ruc(tax_id: &str) -> Result<(), validator::ValidationError> {
    if RUC_RE.is_match(tax_id) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("ruc_must_be_11_digits"))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProviderInput {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(custom = "validate_ruc")]
    pub tax_id: String,
    pub contact_name: Option<String>,
    #[validate(email(message = "Contact email must be valid"))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    /// Comma-joined supply category tags
    pub supply_categories: Option<String>,
    pub fiscal_address: Option<String>,
}

#[derive(Clone)]
pub struct ProviderService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    audit: AuditService,
}

impl ProviderService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>, audit: AuditService) -> Self {
        Self {
            db,
            event_sender,
            audit,
        }
    }

    async fn ruc_taken(&self, tax_id: &str, exclude: Option<Uuid>) -> Result<bool, ServiceError> {
        let mut query = provider::Entity::find().filter(provider::Column::TaxId.eq(tax_id));
        if let Some(id) = exclude {
            query = query.filter(provider::Column::Id.ne(id));
        }
        let count = query
            .count(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok(count > 0)
    }

    #[instrument(skip(self, input), fields(tax_id = %input.tax_id))]
    pub async fn create(
        &self,
        input: ProviderInput,
        actor: &str,
    ) -> Result<provider::Model, ServiceError> {
        input.validate()?;

        if self.ruc_taken(&input.tax_id, None).await? {
            return Err(ServiceError::Conflict(format!(
                "RUC {} is already registered",
                input.tax_id
            )));
        }

        let model = provider::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            tax_id: Set(input.tax_id),
            contact_name: Set(input.contact_name),
            contact_email: Set(input.contact_email),
            contact_phone: Set(input.contact_phone),
            supply_categories: Set(input.supply_categories),
            fiscal_address: Set(input.fiscal_address),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let created = model.insert(&*self.db).await.map_err(|e| {
            error!("failed to insert provider: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        self.audit
            .record(
                actor,
                "PROVEEDOR_CREADO",
                format!("Se registró el proveedor {} (RUC {})", created.name, created.tax_id),
            )
            .await;
        self.event_sender
            .publish(Event::ProviderCreated(created.id))
            .await;

        info!(provider_id = %created.id, "provider created");
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: Uuid,
        input: ProviderInput,
        actor: &str,
    ) -> Result<provider::Model, ServiceError> {
        input.validate()?;

        let existing = self.get(id).await?;

        if self.ruc_taken(&input.tax_id, Some(id)).await? {
            return Err(ServiceError::Conflict(format!(
                "RUC {} already belongs to another provider",
                input.tax_id
            )));
        }

        let mut active: provider::ActiveModel = existing.into();
        active.name = Set(input.name.trim().to_string());
        active.tax_id = Set(input.tax_id);
        active.contact_name = Set(input.contact_name);
        active.contact_email = Set(input.contact_email);
        active.contact_phone = Set(input.contact_phone);
        active.supply_categories = Set(input.supply_categories);
        active.fiscal_address = Set(input.fiscal_address);
        active.updated_at = Set(Some(Utc::now()));

        let updated = active
            .update(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.audit
            .record(
                actor,
                "PROVEEDOR_EDITADO",
                format!("Se modificó el proveedor {}", updated.name),
            )
            .await;
        self.event_sender
            .publish(Event::ProviderUpdated(updated.id))
            .await;

        Ok(updated)
    }

    /// Hard delete. Fails with Conflict while purchase orders still
    /// reference the provider (FK RESTRICT).
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid, actor: &str) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;

        provider::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await
            .map_err(|e| {
                ServiceError::Conflict(format!(
                    "Provider {} cannot be deleted: {}",
                    existing.name, e
                ))
            })?;

        self.audit
            .record(
                actor,
                "PROVEEDOR_ELIMINADO",
                format!("Se eliminó el proveedor {} (RUC {})", existing.name, existing.tax_id),
            )
            .await;
        self.event_sender.publish(Event::ProviderDeleted(id)).await;

        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<provider::Model, ServiceError> {
        provider::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Provider {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        search: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<provider::Model>, u64), ServiceError> {
        let mut condition = Condition::all();
        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            let term = search.trim().to_string();
            condition = condition.add(
                Condition::any()
                    .add(provider::Column::Name.contains(&term))
                    .add(provider::Column::TaxId.contains(&term)),
            );
        }

        let paginator = provider::Entity::find()
            .filter(condition)
            .order_by_asc(provider::Column::Name)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await.map_err(ServiceError::DatabaseError)?;
        let providers = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((providers, total))
    }
}
