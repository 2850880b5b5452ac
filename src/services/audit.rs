use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use tracing::{error, instrument};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::audit_log;
use crate::errors::ServiceError;

/// Append-only audit trail. Entries are written alongside the mutation they
/// describe and only ever read back newest-first.
#[derive(Clone)]
pub struct AuditService {
    db: Arc<DbPool>,
}

impl AuditService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Best-effort: the mutation it describes has already committed, so a
    /// failed write is logged rather than surfaced.
    #[instrument(skip(self, details))]
    pub async fn record(&self, actor: &str, action: &str, details: impl Into<String>) {
        let entry = audit_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            actor: Set(actor.to_string()),
            action: Set(action.to_string()),
            details: Set(details.into()),
            at: Set(Utc::now()),
        };

        if let Err(e) = entry.insert(&*self.db).await {
            error!(action, "failed to write audit entry: {}", e);
        }
    }

    /// Newest-first page of the trail; `search` narrows it to entries whose
    /// action or details mention the term, e.g. one OT code.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        search: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<audit_log::Model>, u64), ServiceError> {
        let mut query = audit_log::Entity::find();
        if let Some(term) = search.filter(|s| !s.trim().is_empty()) {
            let term = term.trim().to_string();
            query = query.filter(
                Condition::any()
                    .add(audit_log::Column::Action.contains(&term))
                    .add(audit_log::Column::Details.contains(&term)),
            );
        }

        let paginator = query
            .order_by_desc(audit_log::Column::At)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await.map_err(ServiceError::DatabaseError)?;
        let entries = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((entries, total))
    }
}
