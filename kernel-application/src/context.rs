use kernel_domain::domain_event::BusinessContext;
use uuid::Uuid;

/// 应用层上下文（Application Context）
///
/// 一次调度（命令/查询）的请求级横切信息，在调用处理器前注入一次：
/// - `request_id`：请求标识，默认随机生成；
/// - 业务语境（`BusinessContext`）：关联追踪 `correlation_id`、因果链 `causation_id`、
///   执行者类型/ID 等。
///
/// 典型用法：
/// ```rust
/// use kernel_application::context::AppContext;
/// use kernel_domain::domain_event::BusinessContext;
///
/// let ctx = AppContext::new(
///     BusinessContext::builder()
///         .correlation_id("cor-123")
///         .actor_type("user")
///         .actor_id("u-1")
///         .build(),
/// );
/// assert_eq!(ctx.correlation_id(), "cor-123");
/// ```
#[derive(Clone, Debug)]
pub struct AppContext {
    pub request_id: Uuid,
    /// 业务语境（链路追踪、审计主体、操作因果）
    pub biz: BusinessContext,
}

impl Default for AppContext {
    fn default() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            biz: BusinessContext::default(),
        }
    }
}

impl AppContext {
    pub fn new(biz: BusinessContext) -> Self {
        Self {
            biz,
            ..Self::default()
        }
    }

    /// 日志关联标识：优先业务关联 ID，否则为请求 ID
    pub fn correlation_id(&self) -> String {
        match self.biz.correlation_id() {
            Some(id) => id.to_string(),
            None => self.request_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_falls_back_to_request_id() {
        let ctx = AppContext::default();
        assert_eq!(ctx.correlation_id(), ctx.request_id.to_string());

        let ctx = AppContext::new(BusinessContext::builder().correlation_id("c-9").build());
        assert_eq!(ctx.correlation_id(), "c-9");
        assert_ne!(AppContext::default().request_id, ctx.request_id);
    }
}
