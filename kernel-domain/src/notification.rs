//! 通知（Notification）
//!
//! 校验失败不以异常形式抛出，而是记录为结构化、可翻译的通知消息：
//! - `NotificationKind`：通知类型（翻译键）；
//! - `NotificationMessage`：一条通知（字段名、字段值、函数名、可选的底层错误）；
//! - `NotificationContext`：一次校验过程中按序累积的通知集合。
//!
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// 通知类型，同时作为翻译键使用
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationKind(Cow<'static, str>);

impl NotificationKind {
    pub const INSERT_NOT_ALLOWED: Self = Self::from_static("InsertNotAllowedNotification");
    pub const UPDATE_NOT_ALLOWED: Self = Self::from_static("UpdateNotAllowedNotification");
    pub const DELETE_NOT_ALLOWED: Self = Self::from_static("DeleteNotAllowedNotification");
    pub const UNABLE_TO_INSERT_WITH_ID: Self =
        Self::from_static("UnableToInsertWithIDNotification");
    pub const UNABLE_TO_UPDATE_WITHOUT_ID: Self =
        Self::from_static("UnableToUpdateWithoutIDNotification");
    pub const UNABLE_TO_DELETE_WITHOUT_ID: Self =
        Self::from_static("UnableToDeleteWithoutIDNotification");
    pub const SERVICE_IS_REQUIRED: Self = Self::from_static("ServiceIsRequiredNotification");
    pub const ENTITY_ALREADY_ADDED: Self = Self::from_static("EntityAlreadyAddedNotification");
    pub const ENTITY_DOES_NOT_EXIST: Self = Self::from_static("EntityDoesNotExistNotification");
    pub const ENTITY_IS_NOT_ACTIVE: Self = Self::from_static("EntityIsNotActiveNotification");
    pub const INVALID_ID_UUID: Self = Self::from_static("InvalidIDUUIDNotification");
    pub const INVALID_ENTITY_MODE: Self = Self::from_static("InvalidEntityModeNotification");
    pub const INVALID_AGGREGATE_ITEM_STATUS: Self =
        Self::from_static("InvalidAggregateItemStatusNotification");
    pub const INVALID_EVENT_TYPE: Self = Self::from_static("InvalidEventTypeNotification");
    pub const INVALID_LANGUAGE: Self = Self::from_static("InvalidLanguageNotification");
    pub const REPOSITORY_FUNCTION_NOT_IMPLEMENTED: Self =
        Self::from_static("RepositoryFunctionNotImplementedNotification");
    pub const PERSISTENCE_REJECTED: Self = Self::from_static("PersistenceRejectedNotification");
    pub const HANDLER_NOT_REGISTERED: Self =
        Self::from_static("HandlerNotRegisteredNotification");

    /// 应用自定义通知类型
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    /// 翻译键
    pub fn key(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 单条通知消息（不可变）
#[derive(Debug, Clone, Builder)]
pub struct NotificationMessage {
    /// 通知类型
    notification: NotificationKind,
    /// 出问题的字段名
    #[builder(into)]
    field_name: Option<String>,
    /// 出问题的字段值（文本形式）
    #[builder(into)]
    field_value: Option<String>,
    /// 产生通知的函数名
    #[builder(into)]
    fun_name: Option<String>,
    /// 附带的底层错误；存在时调度层以 ERROR 级别记录
    exception: Option<Arc<dyn StdError + Send + Sync>>,
}

impl NotificationMessage {
    /// 仅包含通知类型的消息
    pub fn new(notification: NotificationKind) -> Self {
        Self::builder().notification(notification).build()
    }

    /// 针对某个字段的消息
    pub fn for_field(
        notification: NotificationKind,
        field_name: impl Into<String>,
        field_value: Option<String>,
    ) -> Self {
        Self::builder()
            .notification(notification)
            .field_name(field_name)
            .maybe_field_value(field_value)
            .build()
    }

    pub fn notification(&self) -> &NotificationKind {
        &self.notification
    }

    pub fn field_name(&self) -> Option<&str> {
        self.field_name.as_deref()
    }

    pub fn field_value(&self) -> Option<&str> {
        self.field_value.as_deref()
    }

    pub fn fun_name(&self) -> Option<&str> {
        self.fun_name.as_deref()
    }

    pub fn exception(&self) -> Option<&(dyn StdError + Send + Sync)> {
        self.exception.as_deref()
    }
}

impl fmt::Display for NotificationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notification)?;
        if let Some(field) = &self.field_name {
            write!(f, " field={field}")?;
        }
        if let Some(value) = &self.field_value {
            write!(f, " value={value:?}")?;
        }
        if let Some(fun) = &self.fun_name {
            write!(f, " fun={fun}")?;
        }
        if let Some(err) = &self.exception {
            write!(f, " exception={err}")?;
        }
        Ok(())
    }
}

/// 一次校验过程的通知集合
///
/// 只追加；仅在新的校验过程开始时清空。
#[derive(Debug, Clone, Default)]
pub struct NotificationContext {
    context_name: String,
    notifications: Vec<NotificationMessage>,
}

impl NotificationContext {
    pub fn new(context_name: impl Into<String>) -> Self {
        Self {
            context_name: context_name.into(),
            notifications: Vec::new(),
        }
    }

    pub fn context_name(&self) -> &str {
        &self.context_name
    }

    pub fn add_notification(&mut self, message: NotificationMessage) {
        self.notifications.push(message);
    }

    pub fn notifications(&self) -> &[NotificationMessage] {
        &self.notifications
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    /// 是否存在携带底层错误的通知
    pub fn has_exception(&self) -> bool {
        self.notifications.iter().any(|n| n.exception.is_some())
    }

    /// 是否包含指定类型的通知
    pub fn contains(&self, kind: &NotificationKind) -> bool {
        self.notifications.iter().any(|n| &n.notification == kind)
    }

    /// 将所有字段名为 `original` 的通知改名为 `new`（面向用户的字段重命名）
    pub fn change_field_name(&mut self, original: &str, new: &str) {
        for n in &mut self.notifications {
            if n.field_name.as_deref() == Some(original) {
                n.field_name = Some(new.to_string());
            }
        }
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }

    /// 浅拷贝，可选地更换上下文名
    pub fn copy(&self, context_name: Option<&str>) -> Self {
        Self {
            context_name: context_name.map_or_else(|| self.context_name.clone(), str::to_string),
            notifications: self.notifications.clone(),
        }
    }
}

impl Extend<NotificationMessage> for NotificationContext {
    fn extend<I: IntoIterator<Item = NotificationMessage>>(&mut self, iter: I) {
        self.notifications.extend(iter);
    }
}

impl fmt::Display for NotificationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.context_name)?;
        for (i, n) in self.notifications.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{n}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("boom")
        }
    }

    impl StdError for Boom {}

    // 测试字段重命名只影响匹配的字段
    #[test]
    fn change_field_name_renames_matching_messages() {
        let mut ctx = NotificationContext::new("Customer");
        ctx.add_notification(NotificationMessage::for_field(
            NotificationKind::INVALID_ID_UUID,
            "id",
            Some("x".into()),
        ));
        ctx.add_notification(NotificationMessage::for_field(
            NotificationKind::new("InvalidNameNotification"),
            "name",
            None,
        ));

        ctx.change_field_name("id", "customerId");

        let names: Vec<_> = ctx.notifications().iter().map(|n| n.field_name()).collect();
        assert_eq!(names, vec![Some("customerId"), Some("name")]);
    }

    #[test]
    fn has_exception_detects_attached_errors() {
        let mut ctx = NotificationContext::new("Repo");
        ctx.add_notification(NotificationMessage::new(NotificationKind::ENTITY_DOES_NOT_EXIST));
        assert!(!ctx.has_exception());

        ctx.add_notification(
            NotificationMessage::builder()
                .notification(NotificationKind::PERSISTENCE_REJECTED)
                .exception(Arc::new(Boom))
                .build(),
        );
        assert!(ctx.has_exception());
        assert!(ctx.to_string().contains("exception=boom"));
    }

    // 测试 copy 保留通知并可改名
    #[test]
    fn copy_keeps_messages_under_new_name() {
        let mut ctx = NotificationContext::new("Order");
        ctx.add_notification(NotificationMessage::new(NotificationKind::INSERT_NOT_ALLOWED));

        let copied = ctx.copy(Some("Pipeline"));
        assert_eq!(copied.context_name(), "Pipeline");
        assert_eq!(copied.len(), 1);
        assert!(copied.contains(&NotificationKind::INSERT_NOT_ALLOWED));
        assert_eq!(ctx.copy(None).context_name(), "Order");

        ctx.clear_notifications();
        assert!(ctx.is_empty());
        assert_eq!(copied.len(), 1);
    }

    #[test]
    fn custom_kinds_compare_by_key() {
        let a = NotificationKind::new("InsertNotAllowedNotification");
        assert_eq!(a, NotificationKind::INSERT_NOT_ALLOWED);
        assert_eq!(a.key(), "InsertNotAllowedNotification");
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            "\"InsertNotAllowedNotification\""
        );
    }
}
