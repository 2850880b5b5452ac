use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::client;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::PersonKind;
use crate::services::audit::AuditService;

#[derive(Debug, Deserialize, Validate)]
pub struct ClientInput {
    #[validate(length(min = 8, max = 11, message = "Tax id must be a DNI or RUC"))]
    pub tax_id: String,
    #[validate(length(min = 1, max = 200, message = "Legal name is required"))]
    pub legal_name: String,
    /// Inferred from the tax id when absent
    pub person_kind: Option<PersonKind>,
    pub contact_name: Option<String>,
    #[validate(email(message = "Email must be valid"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Clone)]
pub struct ClientService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    audit: AuditService,
}

impl ClientService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>, audit: AuditService) -> Self {
        Self {
            db,
            event_sender,
            audit,
        }
    }

    #[instrument(skip(self, input), fields(tax_id = %input.tax_id))]
    pub async fn create(
        &self,
        input: ClientInput,
        actor: &str,
    ) -> Result<client::Model, ServiceError> {
        input.validate()?;

        let kind = input
            .person_kind
            .unwrap_or_else(|| PersonKind::infer_from_tax_id(&input.tax_id));

        let model = client::ActiveModel {
            id: Set(Uuid::new_v4()),
            tax_id: Set(input.tax_id.trim().to_string()),
            legal_name: Set(input.legal_name.trim().to_string()),
            person_kind: Set(kind.to_string()),
            contact_name: Set(input.contact_name),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let created = model
            .insert(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.audit
            .record(
                actor,
                "CLIENTE_CREADO",
                format!("Se registró el cliente {}", created.legal_name),
            )
            .await;
        self.event_sender
            .publish(Event::ClientCreated(created.id))
            .await;

        info!(client_id = %created.id, "client created");
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: Uuid,
        input: ClientInput,
        actor: &str,
    ) -> Result<client::Model, ServiceError> {
        input.validate()?;

        let existing = self.get(id).await?;
        let kind = input
            .person_kind
            .unwrap_or_else(|| PersonKind::infer_from_tax_id(&input.tax_id));

        let mut active: client::ActiveModel = existing.into();
        active.tax_id = Set(input.tax_id.trim().to_string());
        active.legal_name = Set(input.legal_name.trim().to_string());
        active.person_kind = Set(kind.to_string());
        active.contact_name = Set(input.contact_name);
        active.email = Set(input.email);
        active.phone = Set(input.phone);
        active.address = Set(input.address);
        active.updated_at = Set(Some(Utc::now()));

        let updated = active
            .update(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.audit
            .record(
                actor,
                "CLIENTE_EDITADO",
                format!("Se modificó el cliente {}", updated.legal_name),
            )
            .await;
        self.event_sender
            .publish(Event::ClientUpdated(updated.id))
            .await;

        Ok(updated)
    }

    /// Hard delete. Fails with Conflict while orders still reference the
    /// client (FK RESTRICT).
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid, actor: &str) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;

        client::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await
            .map_err(|e| {
                ServiceError::Conflict(format!(
                    "Client {} cannot be deleted: {}",
                    existing.legal_name, e
                ))
            })?;

        self.audit
            .record(
                actor,
                "CLIENTE_ELIMINADO",
                format!("Se eliminó el cliente {}", existing.legal_name),
            )
            .await;

        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<client::Model, ServiceError> {
        client::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Client {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        search: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<client::Model>, u64), ServiceError> {
        let mut condition = Condition::all();
        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            let term = search.trim().to_string();
            condition = condition.add(
                Condition::any()
                    .add(client::Column::LegalName.contains(&term))
                    .add(client::Column::TaxId.contains(&term)),
            );
        }

        let paginator = client::Entity::find()
            .filter(condition)
            .order_by_asc(client::Column::LegalName)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await.map_err(ServiceError::DatabaseError)?;
        let clients = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((clients, total))
    }
}
