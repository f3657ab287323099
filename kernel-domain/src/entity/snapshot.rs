use crate::domain_event::DomainEvent;
use crate::value_object::Id;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 允许新增的实体快照
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insertable<I> {
    entity_name: &'static str,
    id: Option<Id>,
    fields: I,
    date_time: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

/// 允许修改的实体快照
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Updatable<U> {
    entity_name: &'static str,
    id: Id,
    fields: U,
    date_time: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

/// 允许删除的实体快照，携带整个实体的 JSON 形式
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deletable {
    entity_name: &'static str,
    id: Id,
    deleted_fields: serde_json::Value,
    date_time: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

impl<I> Insertable<I> {
    pub(crate) fn new(
        entity_name: &'static str,
        id: Option<Id>,
        fields: I,
        events: Vec<DomainEvent>,
    ) -> Self {
        Self {
            entity_name,
            id,
            fields,
            date_time: Utc::now(),
            events,
        }
    }

    pub fn entity_name(&self) -> &'static str {
        self.entity_name
    }

    pub fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    pub fn fields(&self) -> &I {
        &self.fields
    }

    pub fn date_time(&self) -> &DateTime<Utc> {
        &self.date_time
    }

    pub fn events(&self) -> &[DomainEvent] {
        &self.events
    }
}

impl<U> Updatable<U> {
    pub(crate) fn new(
        entity_name: &'static str,
        id: Id,
        fields: U,
        events: Vec<DomainEvent>,
    ) -> Self {
        Self {
            entity_name,
            id,
            fields,
            date_time: Utc::now(),
            events,
        }
    }

    pub fn entity_name(&self) -> &'static str {
        self.entity_name
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn fields(&self) -> &U {
        &self.fields
    }

    pub fn date_time(&self) -> &DateTime<Utc> {
        &self.date_time
    }

    pub fn events(&self) -> &[DomainEvent] {
        &self.events
    }
}

impl Deletable {
    pub(crate) fn new(
        entity_name: &'static str,
        id: Id,
        deleted_fields: serde_json::Value,
        events: Vec<DomainEvent>,
    ) -> Self {
        Self {
            entity_name,
            id,
            deleted_fields,
            date_time: Utc::now(),
            events,
        }
    }

    pub fn entity_name(&self) -> &'static str {
        self.entity_name
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn deleted_fields(&self) -> &serde_json::Value {
        &self.deleted_fields
    }

    pub fn date_time(&self) -> &DateTime<Utc> {
        &self.date_time
    }

    pub fn events(&self) -> &[DomainEvent] {
        &self.events
    }
}

/// 有效实体：仓储唯一允许持久化的形式
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ValidEntity<I, U> {
    Insertable(Insertable<I>),
    Updatable(Updatable<U>),
    Deletable(Deletable),
}

impl<I, U> ValidEntity<I, U> {
    /// 审计日志中的动作名
    pub fn action(&self) -> &'static str {
        match self {
            Self::Insertable(_) => "Insert",
            Self::Updatable(_) => "Update",
            Self::Deletable(_) => "Delete",
        }
    }

    pub fn entity_name(&self) -> &'static str {
        match self {
            Self::Insertable(v) => v.entity_name(),
            Self::Updatable(v) => v.entity_name(),
            Self::Deletable(v) => v.entity_name(),
        }
    }

    pub fn id(&self) -> Option<&Id> {
        match self {
            Self::Insertable(v) => v.id(),
            Self::Updatable(v) => Some(v.id()),
            Self::Deletable(v) => Some(v.id()),
        }
    }

    pub fn date_time(&self) -> &DateTime<Utc> {
        match self {
            Self::Insertable(v) => v.date_time(),
            Self::Updatable(v) => v.date_time(),
            Self::Deletable(v) => v.date_time(),
        }
    }

    pub fn events(&self) -> &[DomainEvent] {
        match self {
            Self::Insertable(v) => v.events(),
            Self::Updatable(v) => v.events(),
            Self::Deletable(v) => v.events(),
        }
    }
}

impl<I, U> From<Insertable<I>> for ValidEntity<I, U> {
    fn from(value: Insertable<I>) -> Self {
        Self::Insertable(value)
    }
}

impl<I, U> From<Updatable<U>> for ValidEntity<I, U> {
    fn from(value: Updatable<U>) -> Self {
        Self::Updatable(value)
    }
}

impl<I, U> From<Deletable> for ValidEntity<I, U> {
    fn from(value: Deletable) -> Self {
        Self::Deletable(value)
    }
}
