use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ConnectionTrait, Set};
use serde_json::Value;
use uuid::Uuid;

use crate::{entity::audit_logs::ActiveModel as AuditActive, error::AppResult};

#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub actor_id: Option<Uuid>,
    pub action: &'static str,
    pub resource: &'static str,
    pub resource_id: Option<Uuid>,
    pub metadata: Option<Value>,
}

impl AuditEvent {
    pub fn new(action: &'static str, resource: &'static str) -> Self {
        Self {
            actor_id: None,
            action,
            resource,
            resource_id: None,
            metadata: None,
        }
    }

    pub fn actor(mut self, actor_id: Option<Uuid>) -> Self {
        self.actor_id = actor_id;
        self
    }

    pub fn target(mut self, resource_id: Uuid) -> Self {
        self.resource_id = Some(resource_id);
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

pub async fn log_audit<C: ConnectionTrait>(conn: &C, event: AuditEvent) -> AppResult<()> {
    AuditActive {
        id: Set(Uuid::new_v4()),
        actor_id: Set(event.actor_id),
        action: Set(event.action.to_string()),
        resource: Set(event.resource.to_string()),
        resource_id: Set(event.resource_id),
        metadata: Set(event.metadata),
        created_at: NotSet,
    }
    .insert(conn)
    .await?;

    Ok(())
}
