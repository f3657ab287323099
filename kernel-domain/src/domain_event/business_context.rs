use bon::Builder;
use serde::{Deserialize, Serialize};

/// 业务上下文：请求的关联信息与触发主体，用于日志关联与审计
#[derive(Builder, Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessContext {
    /// 关联ID
    #[builder(into)]
    correlation_id: Option<String>,
    /// 因果ID
    #[builder(into)]
    causation_id: Option<String>,
    /// 触发操作的主体类型（如用户、系统等）
    #[builder(into)]
    actor_type: Option<String>,
    /// 触发操作的主体ID
    #[builder(into)]
    actor_id: Option<String>,
}

impl BusinessContext {
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn causation_id(&self) -> Option<&str> {
        self.causation_id.as_deref()
    }

    pub fn actor_type(&self) -> Option<&str> {
        self.actor_type.as_deref()
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    /// 审计日志中的主体描述，形如 `user:42`
    pub fn actor(&self) -> Option<String> {
        match (self.actor_type(), self.actor_id()) {
            (Some(t), Some(id)) => Some(format!("{t}:{id}")),
            (None, Some(id)) => Some(id.to_string()),
            (Some(t), None) => Some(t.to_string()),
            (None, None) => None,
        }
    }
}
