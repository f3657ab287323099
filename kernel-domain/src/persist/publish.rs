//! 提交后的发布：审计记录与领域事件写入日志
//!
//! 审计记录使用 target `kernel::audit`（INFO）；领域事件使用 target `kernel::events`，
//! 级别由事件类型决定：AUDIT/LOG → INFO，DEBUG → DEBUG，WARNING → WARN，其余 → ERROR。
//!
use crate::domain_event::{DomainEvent, EventType};
use crate::value_object::Id;

/// 记录一次写操作的审计日志
pub fn log_audit(action: &str, entity_name: &str, id: Option<&Id>, correlation_id: &str) {
    let id = id.map(Id::to_string).unwrap_or_default();
    tracing::info!(
        target: "kernel::audit",
        correlation_id,
        action,
        entity = entity_name,
        id = %id,
        "{action} {entity_name}"
    );
}

/// 按事件类型的级别记录单个领域事件
pub fn log_event(event: &DomainEvent, correlation_id: &str) {
    let class_name = event.class_name();
    let values = event
        .values()
        .map(|v| v.to_string())
        .unwrap_or_default();
    let exception = event.exception().unwrap_or_default();
    let message = event.message();

    match event.event_type() {
        EventType::Audit | EventType::Log => tracing::info!(
            target: "kernel::events",
            correlation_id,
            class_name,
            values = %values,
            "{message}"
        ),
        EventType::Debug => tracing::debug!(
            target: "kernel::events",
            correlation_id,
            class_name,
            values = %values,
            "{message}"
        ),
        EventType::Warning => tracing::warn!(
            target: "kernel::events",
            correlation_id,
            class_name,
            values = %values,
            "{message}"
        ),
        EventType::Error | EventType::Unknown => tracing::error!(
            target: "kernel::events",
            correlation_id,
            class_name,
            values = %values,
            exception,
            "{message}"
        ),
    }
}

pub fn log_events(events: &[DomainEvent], correlation_id: &str) {
    for event in events {
        log_event(event, correlation_id);
    }
}
