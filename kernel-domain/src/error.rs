//! 领域层统一错误定义
//!
//! `Notification` 是规则引擎与调度层之间的边界信号：一次校验过程累积的通知上下文
//! 只会在过程结束时整体上抛；其余变体覆盖序列化、解析与仓储/持久化失败，
//! 便于在各实现层统一转换为 `DomainError`。
//!
use crate::notification::NotificationContext;
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 校验通知 ---
    #[error("domain validation failed with {} notification context(s)", .contexts.len())]
    Notification { contexts: Vec<NotificationContext> },

    // --- 序列化/解析 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
    #[error("parse error: {reason}")]
    Parse { reason: String },
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },

    // --- 仓储/持久化 ---
    #[error("repository error: {reason}")]
    Repository { reason: String },
    #[error("database error: {reason}")]
    Database { reason: String },
    #[error("not found: {reason}")]
    NotFound { reason: String },

    // --- 通用 ---
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// 以单个通知上下文构造校验失败信号
    pub fn notification(context: NotificationContext) -> Self {
        Self::Notification {
            contexts: vec![context],
        }
    }

    /// 若为校验失败，返回其携带的通知上下文
    pub fn notification_contexts(&self) -> Option<&[NotificationContext]> {
        match self {
            Self::Notification { contexts } => Some(contexts),
            _ => None,
        }
    }

    /// 存储层失败（约束冲突、连接错误等），调度层会将其降级为通用失败
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Repository { .. } | Self::Database { .. })
    }
}

// 允许在基础设施层直接使用 `?` 将 sqlx/uuid 等错误转换为 DomainError

#[cfg(feature = "infra-sqlx")]
impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DomainError::NotFound {
                reason: "row not found".to_string(),
            },
            other => DomainError::Database {
                reason: other.to_string(),
            },
        }
    }
}

impl From<uuid::Error> for DomainError {
    fn from(err: uuid::Error) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}
