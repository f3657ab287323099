//! 内核过程宏（kernel-macros）
//!
//! - `#[value_object]`：为值对象合并派生，`scalar` 模式下额外生成标量包装的便捷实现；
//! - `#[enum_value_object]`：为无字段枚举实现 `EnumValueObject`/`ValueObject`。
//!
use proc_macro::TokenStream;

mod derive_utils;
mod enum_value_object;
mod value_object;

/// 值对象宏
///
/// - 合并/追加派生：Debug（可关闭）、Clone、Serialize、Deserialize、PartialEq、Eq，
///   以及（默认开启的）Default；
/// - 参数：`#[value_object(debug = bool, default = bool, scalar)]`
///   - `scalar`：仅用于单字段 tuple struct，额外派生 Hash 并生成 `value()`、`Display`、`From` 等实现
#[proc_macro_attribute]
pub fn value_object(attr: TokenStream, item: TokenStream) -> TokenStream {
    value_object::expand(attr, item)
}

/// 枚举值对象宏
///
/// 仅支持所有变体均为无字段且带显式整数判别值的枚举，并且必须存在判别值为 0 的“未知”变体：
///
/// ```ignore
/// #[enum_value_object(unknown = NotificationKind::INVALID_EVENT_TYPE)]
/// pub enum EventType {
///     Unknown = 0,
///     Log = 1,
/// }
/// ```
///
/// - `unknown`（必填）：未知变体被校验时记录的通知类型表达式；
/// - `type_name`（可选）：描述键前缀，默认使用枚举名。
#[proc_macro_attribute]
pub fn enum_value_object(attr: TokenStream, item: TokenStream) -> TokenStream {
    enum_value_object::expand(attr, item)
}
