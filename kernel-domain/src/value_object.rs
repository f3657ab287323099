//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的对象。值对象不会因业务规则而失败：
//! 校验不通过时向调用方提供的 `NotificationContext` 记录通知并返回 `false`。
//!
//! - `ValueObject`：自校验契约；
//! - `EnumValueObject`：带“未知”哨兵（值为 0）的枚举值对象，通常由 `#[enum_value_object]` 生成；
//! - `AggregateValueObject`：聚合子对象的异步、按模式校验；
//! - `AggregateItemValue`：可存入聚合项账本的值；
//! - `Id`：以 UUID 文本表示的实体标识。
//!
use crate::entity::EntityMode;
use crate::error::{DomainError, DomainResult};
use crate::notification::{NotificationContext, NotificationKind, NotificationMessage};
use async_trait::async_trait;
use kernel_macros::value_object;
use std::fmt::Debug;
use uuid::Uuid;

/// 值对象抽象
pub trait ValueObject {
    /// 校验自身；无效时向 `ctx` 记录通知并返回 `false`
    fn is_valid(&self, field_name: Option<&str>, ctx: Option<&mut NotificationContext>) -> bool {
        let _ = (field_name, ctx);
        true
    }
}

/// 枚举值对象
///
/// 判别值为 0 的变体是“未知”哨兵，校验时视为无效；
/// 描述键形如 `"<TypeName>.<VARIANT>"`，用于翻译枚举的展示文本。
pub trait EnumValueObject: ValueObject + Copy + Default + PartialEq + Debug + 'static {
    /// 描述键前缀
    const TYPE_NAME: &'static str;

    fn value(&self) -> i32;

    /// 变体名（SCREAMING_SNAKE_CASE）
    fn name(&self) -> &'static str;

    fn variants() -> &'static [Self];

    /// 未知变体被校验时记录的通知类型
    fn unknown_notification() -> NotificationKind;

    fn is_unknown(&self) -> bool {
        self.value() == 0
    }

    fn description_key(&self) -> String {
        format!("{}.{}", Self::TYPE_NAME, self.name())
    }

    /// 按值查找，找不到时回退到未知变体
    fn from_value(value: i32) -> Self {
        Self::variants()
            .iter()
            .copied()
            .find(|v| v.value() == value)
            .unwrap_or_default()
    }

    /// 按名称（忽略大小写）查找，找不到时回退到未知变体
    fn from_name(name: &str) -> Self {
        Self::variants()
            .iter()
            .copied()
            .find(|v| v.name().eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }

    /// 未知变体记录 `unknown_notification()` 并返回 `false`
    fn check_known(&self, field_name: Option<&str>, ctx: Option<&mut NotificationContext>) -> bool {
        if !self.is_unknown() {
            return true;
        }
        if let Some(ctx) = ctx {
            ctx.add_notification(
                NotificationMessage::builder()
                    .notification(Self::unknown_notification())
                    .maybe_field_name(field_name)
                    .field_value(self.name())
                    .build(),
            );
        }
        false
    }
}

/// 聚合子对象的按模式校验
///
/// `S` 为实体的领域服务类型；默认实现退化为 `ValueObject::is_valid`。
#[async_trait]
pub trait AggregateValueObject<S: ?Sized + Sync>: ValueObject + Send + Sync {
    async fn validate(
        &self,
        service: Option<&S>,
        mode: EntityMode,
        field_name: Option<&str>,
        ctx: &mut NotificationContext,
    ) -> bool {
        let _ = (service, mode);
        self.is_valid(field_name, Some(ctx))
    }
}

/// 可存入聚合项账本的值
///
/// 账本按值相等定位条目；`is_active` 为 `false` 的值不允许加入。
pub trait AggregateItemValue: ValueObject + PartialEq + Clone + Debug + Send + Sync + 'static {
    fn is_active(&self) -> bool {
        true
    }
}

/// 实体标识：以文本保存的 UUID
///
/// 文本可能来自外部输入，因此构造时不校验；通过 `is_valid`/`uuid` 检查格式。
#[value_object(scalar, default = false)]
pub struct Id(String);

impl Id {
    /// 生成新的 v4 标识
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// 解析为 UUID；格式不正确时返回携带 `InvalidIDUUIDNotification` 的校验失败
    pub fn uuid(&self) -> DomainResult<Uuid> {
        Uuid::parse_str(&self.0).map_err(|_| {
            let mut ctx = NotificationContext::new("Id");
            ctx.add_notification(self.invalid_message("id"));
            DomainError::notification(ctx)
        })
    }

    fn invalid_message(&self, field_name: &str) -> NotificationMessage {
        NotificationMessage::builder()
            .notification(NotificationKind::INVALID_ID_UUID)
            .field_name(field_name)
            .field_value(self.0.clone())
            .build()
    }
}

impl From<Uuid> for Id {
    fn from(value: Uuid) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl ValueObject for Id {
    fn is_valid(&self, field_name: Option<&str>, ctx: Option<&mut NotificationContext>) -> bool {
        if Uuid::parse_str(&self.0).is_ok() {
            return true;
        }
        if let Some(ctx) = ctx {
            ctx.add_notification(self.invalid_message(field_name.unwrap_or("id")));
        }
        false
    }
}
