use kernel_domain::error::DomainError;
use kernel_domain::notification::NotificationContext;

/// 应用层错误
///
/// 调度管线据此划分结果：通知类 → `Failure`，持久化类 → 通用 `Failure`，其余 → `Exception`。
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("application validation failed with {} notification context(s)", .contexts.len())]
    Notification { contexts: Vec<NotificationContext> },

    #[error("infrastructure validation failed with {} notification context(s)", .contexts.len())]
    Infrastructure { contexts: Vec<NotificationContext> },

    #[error("persistence: {reason}")]
    Persistence { reason: String },

    #[error("handler already registered: query={query}")]
    AlreadyRegisteredQuery { query: &'static str },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("translation not found: key={key}, language={language}")]
    TranslationNotFound { key: String, language: String },

    #[error("dispatch cancelled")]
    Cancelled,

    #[error("handler panicked: {0}")]
    Panicked(String),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// 应用层通知失败
    pub fn notification(context: NotificationContext) -> Self {
        Self::Notification {
            contexts: vec![context],
        }
    }

    /// 基础设施层通知失败
    pub fn infrastructure(context: NotificationContext) -> Self {
        Self::Infrastructure {
            contexts: vec![context],
        }
    }

    /// 任意层的通知上下文（领域、应用或基础设施）
    pub fn notification_contexts(&self) -> Option<&[NotificationContext]> {
        match self {
            Self::Domain(err) => err.notification_contexts(),
            Self::Notification { contexts } | Self::Infrastructure { contexts } => Some(contexts),
            _ => None,
        }
    }

    /// 存储层失败
    pub fn is_persistence(&self) -> bool {
        match self {
            Self::Domain(err) => err.is_persistence(),
            Self::Persistence { .. } => true,
            _ => false,
        }
    }
}
