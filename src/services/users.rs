use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use serde::Deserialize;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthService;
use crate::db::DbPool;
use crate::entities::user;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{Presence, UserRole};
use crate::services::audit::AuditService;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<Presence>,
}

#[derive(Clone)]
pub struct UserService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    audit: AuditService,
}

impl UserService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>, audit: AuditService) -> Self {
        Self {
            db,
            event_sender,
            audit,
        }
    }

    /// Case-insensitive duplicate-email guard. `exclude` skips the row being
    /// edited so a user can keep their own address.
    async fn email_taken(&self, email: &str, exclude: Option<Uuid>) -> Result<bool, ServiceError> {
        let mut query =
            user::Entity::find().filter(user::Column::Email.eq(email.trim().to_lowercase()));
        if let Some(id) = exclude {
            query = query.filter(user::Column::Id.ne(id));
        }
        let count = query
            .count(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok(count > 0)
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(
        &self,
        input: CreateUserInput,
        actor: &str,
    ) -> Result<user::Model, ServiceError> {
        input.validate()?;

        if self.email_taken(&input.email, None).await? {
            return Err(ServiceError::Conflict(format!(
                "A user with email {} already exists",
                input.email
            )));
        }

        let password_hash = AuthService::hash_password(&input.password)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;

        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            email: Set(input.email.trim().to_lowercase()),
            password_hash: Set(password_hash),
            role: Set(input.role.to_string()),
            status: Set(Presence::Offline.to_string()),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let created = model.insert(&*self.db).await.map_err(|e| {
            error!("failed to insert user: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        self.audit
            .record(
                actor,
                "USUARIO_CREADO",
                format!("Se creó el usuario {} ({})", created.name, created.email),
            )
            .await;
        self.event_sender.publish(Event::UserCreated(created.id)).await;

        info!(user_id = %created.id, "user created");
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateUserInput,
        actor: &str,
    ) -> Result<user::Model, ServiceError> {
        input.validate()?;

        let existing = self.get(id).await?;

        if self.email_taken(&input.email, Some(id)).await? {
            return Err(ServiceError::Conflict(format!(
                "Email {} already belongs to another user",
                input.email
            )));
        }

        let mut active: user::ActiveModel = existing.into();
        active.name = Set(input.name.trim().to_string());
        active.email = Set(input.email.trim().to_lowercase());
        active.role = Set(input.role.to_string());
        active.updated_at = Set(Some(Utc::now()));

        let updated = active
            .update(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.audit
            .record(
                actor,
                "USUARIO_EDITADO",
                format!("Se modificó el usuario {}", updated.name),
            )
            .await;
        self.event_sender.publish(Event::UserUpdated(updated.id)).await;

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid, actor: &str) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;

        user::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.audit
            .record(
                actor,
                "USUARIO_ELIMINADO",
                format!("Se eliminó el usuario {} ({})", existing.name, existing.email),
            )
            .await;
        self.event_sender.publish(Event::UserDeleted(id)).await;

        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<user::Model, ServiceError> {
        user::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", id)))
    }

    #[instrument(skip(self, filter))]
    pub async fn list(
        &self,
        filter: UserFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<user::Model>, u64), ServiceError> {
        let mut condition = Condition::all();
        if let Some(search) = filter.search.filter(|s| !s.trim().is_empty()) {
            let term = search.trim().to_string();
            condition = condition.add(
                Condition::any()
                    .add(user::Column::Name.contains(&term))
                    .add(user::Column::Email.contains(&term)),
            );
        }
        if let Some(role) = filter.role {
            condition = condition.add(user::Column::Role.eq(role.to_string()));
        }
        if let Some(status) = filter.status {
            condition = condition.add(user::Column::Status.eq(status.to_string()));
        }

        let paginator = user::Entity::find()
            .filter(condition)
            .order_by_asc(user::Column::Name)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await.map_err(ServiceError::DatabaseError)?;
        let users = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((users, total))
    }
}
