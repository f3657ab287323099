use crate::notification::NotificationKind;
use kernel_macros::enum_value_object;

/// 实体模式：每次校验过程对应一种模式，DISPLAY 为静止态
#[enum_value_object(unknown = NotificationKind::INVALID_ENTITY_MODE)]
pub enum EntityMode {
    Unknown = 0,
    Display = 1,
    Insert = 2,
    Update = 3,
    Delete = 4,
}
