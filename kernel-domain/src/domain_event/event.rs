use crate::error::DomainResult;
use crate::notification::NotificationKind;
use bon::Builder;
use chrono::{DateTime, Utc};
use kernel_macros::enum_value_object;
use serde::{Deserialize, Serialize};

/// 事件类型，决定发布时的日志级别
#[enum_value_object(unknown = NotificationKind::INVALID_EVENT_TYPE)]
pub enum EventType {
    Unknown = 0,
    Log = 1,
    Audit = 2,
    Debug = 3,
    Error = 4,
    Warning = 5,
}

/// 校验过程中登记的领域事件，随有效实体快照一起交给仓储发布
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEvent {
    event_type: EventType,
    /// 产生事件的实体/类型名
    #[builder(into)]
    class_name: String,
    #[builder(into)]
    message: String,
    /// 附带的结构化数据
    #[serde(default, skip_serializing_if = "Option::is_none")]
    values: Option<serde_json::Value>,
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exception: Option<String>,
    #[builder(default = Utc::now())]
    occurred_at: DateTime<Utc>,
}

impl DomainEvent {
    pub fn new(
        event_type: EventType,
        class_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::builder()
            .event_type(event_type)
            .class_name(class_name)
            .message(message)
            .build()
    }

    pub fn log(class_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(EventType::Log, class_name, message)
    }

    pub fn audit(class_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(EventType::Audit, class_name, message)
    }

    pub fn warning(class_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(EventType::Warning, class_name, message)
    }

    pub fn error(
        class_name: impl Into<String>,
        message: impl Into<String>,
        exception: &dyn std::error::Error,
    ) -> Self {
        Self::builder()
            .event_type(EventType::Error)
            .class_name(class_name)
            .message(message)
            .exception(exception.to_string())
            .build()
    }

    /// 附加可序列化的数据
    pub fn with_values<V: Serialize>(mut self, values: &V) -> DomainResult<Self> {
        self.values = Some(serde_json::to_value(values)?);
        Ok(self)
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn values(&self) -> Option<&serde_json::Value> {
        self.values.as_ref()
    }

    pub fn exception(&self) -> Option<&str> {
        self.exception.as_deref()
    }

    pub fn occurred_at(&self) -> &DateTime<Utc> {
        &self.occurred_at
    }
}
