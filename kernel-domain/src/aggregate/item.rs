use crate::notification::NotificationKind;
use kernel_macros::enum_value_object;
use serde::Serialize;

/// 聚合项的生命周期状态
#[enum_value_object(unknown = NotificationKind::INVALID_AGGREGATE_ITEM_STATUS)]
pub enum AggregateItemStatus {
    Unknown = 0,
    /// 从持久化加载，未修改
    Constructor = 1,
    /// 本次新增
    Added = 2,
    /// 本次修改
    Changed = 3,
    /// 本次标记删除
    Removed = 4,
}

/// 聚合项：子值对象及其原始/当前状态
///
/// 条目本身不可变，修改时整体替换。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateItem<T> {
    item: T,
    original_status: AggregateItemStatus,
    current_status: AggregateItemStatus,
}

impl<T> AggregateItem<T> {
    pub(crate) fn new(
        item: T,
        original_status: AggregateItemStatus,
        current_status: AggregateItemStatus,
    ) -> Self {
        Self {
            item,
            original_status,
            current_status,
        }
    }

    pub fn item(&self) -> &T {
        &self.item
    }

    pub fn original_status(&self) -> AggregateItemStatus {
        self.original_status
    }

    pub fn current_status(&self) -> AggregateItemStatus {
        self.current_status
    }

    pub fn is_removed(&self) -> bool {
        self.current_status == AggregateItemStatus::Removed
    }

    pub(crate) fn set_current_status(&mut self, status: AggregateItemStatus) {
        self.current_status = status;
    }
}

/// 聚合项列表的增量投影
///
/// 持久化适配器据此只写出发生变化的部分，而不是重写整个集合。
pub trait AggregateItems<T> {
    /// 未删除的项
    fn current_items(&self) -> Vec<&T>;
    /// 新增的项（原始状态非 CONSTRUCTOR 且未删除）
    fn added_items(&self) -> Vec<&T>;
    /// 已持久化且本次新增/修改的项
    fn changed_items(&self) -> Vec<&T>;
    /// 已持久化且本次删除的项
    fn removed_items(&self) -> Vec<&T>;
}

impl<T> AggregateItems<T> for [AggregateItem<T>] {
    fn current_items(&self) -> Vec<&T> {
        select(self, |i| !i.is_removed())
    }

    fn added_items(&self) -> Vec<&T> {
        select(self, |i| {
            i.original_status != AggregateItemStatus::Constructor && !i.is_removed()
        })
    }

    fn changed_items(&self) -> Vec<&T> {
        select(self, |i| {
            i.original_status == AggregateItemStatus::Constructor
                && matches!(
                    i.current_status,
                    AggregateItemStatus::Added | AggregateItemStatus::Changed
                )
        })
    }

    fn removed_items(&self) -> Vec<&T> {
        select(self, |i| {
            i.original_status == AggregateItemStatus::Constructor && i.is_removed()
        })
    }
}

fn select<T>(items: &[AggregateItem<T>], pred: impl Fn(&AggregateItem<T>) -> bool) -> Vec<&T> {
    items.iter().filter(|i| pred(i)).map(|i| &i.item).collect()
}
