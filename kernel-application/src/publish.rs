use crate::context::AppContext;
use kernel_domain::domain_event::DomainEvent;
use kernel_domain::entity::ValidEntity;
use kernel_domain::persist::{log_audit, log_events};

/// 以请求的关联标识记录领域事件
pub fn publish_events(events: &[DomainEvent], ctx: &AppContext) {
    log_events(events, &ctx.correlation_id());
}

/// 有效实体的审计发布
pub trait PublishValidEntity {
    fn publish(&self, ctx: &AppContext);
}

impl<I, U> PublishValidEntity for ValidEntity<I, U> {
    fn publish(&self, ctx: &AppContext) {
        let correlation_id = ctx.correlation_id();
        log_audit(self.action(), self.entity_name(), self.id(), &correlation_id);
        log_events(self.events(), &correlation_id);
    }
}
