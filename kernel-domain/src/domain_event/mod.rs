//! 领域事件（Domain Event）
//!
//! 实体在校验过程中登记事件（`DomainEvent`），随有效实体快照一起交给仓储，
//! 在提交之后按事件类型（`EventType`）发布到日志；`BusinessContext` 提供关联ID与触发主体。

mod business_context;
mod event;

pub use business_context::BusinessContext;
pub use event::{DomainEvent, EventType};
