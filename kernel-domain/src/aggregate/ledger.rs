use super::item::{AggregateItem, AggregateItemStatus, AggregateItems};
use crate::notification::{NotificationKind, NotificationMessage};
use crate::value_object::AggregateItemValue;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

struct Slot {
    type_name: &'static str,
    items: Box<dyn Any + Send + Sync>,
}

impl Slot {
    fn new<T: AggregateItemValue>(items: Vec<AggregateItem<T>>) -> Self {
        Self {
            type_name: short_type_name::<T>(),
            items: Box::new(items),
        }
    }
}

/// 聚合项账本
///
/// 按子值对象类型分组记录各条目的生命周期状态。每个操作要么完整生效，
/// 要么不做任何修改并返回一条拒绝通知。
#[derive(Default)]
pub struct AggregateLedger {
    slots: HashMap<TypeId, Slot>,
}

impl AggregateLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 装载持久化数据（CONSTRUCTOR/CONSTRUCTOR），返回被拒绝项的通知
    pub fn construct<T, I>(&mut self, items: I) -> Vec<NotificationMessage>
    where
        T: AggregateItemValue,
        I: IntoIterator<Item = T>,
    {
        let mut rejected = Vec::new();
        self.with_items::<T, _>(|entries| {
            for item in items {
                if !item.is_active() {
                    rejected.push(not_active(&item, "construct_aggregate_items"));
                    continue;
                }
                entries.push(AggregateItem::new(
                    item,
                    AggregateItemStatus::Constructor,
                    AggregateItemStatus::Constructor,
                ));
            }
        });
        rejected
    }

    /// 新增；已删除或已修改的相等项会被重新激活为 ADDED
    pub fn add<T: AggregateItemValue>(
        &mut self,
        item: impl Into<Option<T>>,
    ) -> Result<(), NotificationMessage> {
        const FUN: &str = "add_aggregate_item";
        let item = admissible(item.into(), FUN)?;

        self.with_items(|entries: &mut Vec<AggregateItem<T>>| {
            let already = entries.iter().any(|e| {
                e.item() == &item
                    && matches!(
                        e.current_status(),
                        AggregateItemStatus::Added | AggregateItemStatus::Constructor
                    )
            });
            if already {
                return Err(rejection::<T>(
                    NotificationKind::ENTITY_ALREADY_ADDED,
                    Some(&item),
                    FUN,
                ));
            }

            let dormant = entries.iter_mut().find(|e| {
                e.item() == &item
                    && matches!(
                        e.current_status(),
                        AggregateItemStatus::Removed | AggregateItemStatus::Changed
                    )
            });
            match dormant {
                Some(entry) => entry.set_current_status(AggregateItemStatus::Added),
                None => entries.push(AggregateItem::new(
                    item,
                    AggregateItemStatus::Added,
                    AggregateItemStatus::Added,
                )),
            }
            Ok(())
        })
    }

    /// 以 `transform` 的结果整体替换相等项，状态置为 CHANGED，原始状态保留
    pub fn change<T: AggregateItemValue>(
        &mut self,
        item: impl Into<Option<T>>,
        transform: impl FnOnce(&T) -> T,
    ) -> Result<(), NotificationMessage> {
        const FUN: &str = "change_aggregate_item";
        let Some(item) = item.into() else {
            return Err(rejection::<T>(NotificationKind::ENTITY_DOES_NOT_EXIST, None, FUN));
        };

        self.with_items(|entries: &mut Vec<AggregateItem<T>>| {
            let Some(entry) = entries.iter_mut().find(|e| e.item() == &item) else {
                return Err(rejection::<T>(
                    NotificationKind::ENTITY_DOES_NOT_EXIST,
                    Some(&item),
                    FUN,
                ));
            };
            *entry = AggregateItem::new(
                transform(entry.item()),
                entry.original_status(),
                AggregateItemStatus::Changed,
            );
            Ok(())
        })
    }

    /// 软删除：首个未删除的相等项置为 REMOVED，条目保留
    pub fn remove<T: AggregateItemValue>(
        &mut self,
        item: impl Into<Option<T>>,
    ) -> Result<(), NotificationMessage> {
        const FUN: &str = "remove_aggregate_item";
        let Some(item) = item.into() else {
            return Err(rejection::<T>(NotificationKind::ENTITY_DOES_NOT_EXIST, None, FUN));
        };

        self.with_items(|entries: &mut Vec<AggregateItem<T>>| {
            match entries
                .iter_mut()
                .find(|e| !e.is_removed() && e.item() == &item)
            {
                Some(entry) => {
                    entry.set_current_status(AggregateItemStatus::Removed);
                    Ok(())
                }
                None => Err(rejection::<T>(
                    NotificationKind::ENTITY_DOES_NOT_EXIST,
                    Some(&item),
                    FUN,
                )),
            }
        })
    }

    /// 将该类型的所有条目置为 REMOVED
    pub fn clear<T: AggregateItemValue>(&mut self) {
        self.with_items(|entries: &mut Vec<AggregateItem<T>>| {
            for e in entries.iter_mut() {
                e.set_current_status(AggregateItemStatus::Removed);
            }
        });
    }

    /// 该类型的全部条目（含已删除）
    pub fn items<T: AggregateItemValue>(&self) -> &[AggregateItem<T>] {
        self.slots
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.items.downcast_ref::<Vec<AggregateItem<T>>>())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn current_items<T: AggregateItemValue>(&self) -> Vec<&T> {
        self.items::<T>().current_items()
    }

    pub fn added_items<T: AggregateItemValue>(&self) -> Vec<&T> {
        self.items::<T>().added_items()
    }

    pub fn changed_items<T: AggregateItemValue>(&self) -> Vec<&T> {
        self.items::<T>().changed_items()
    }

    pub fn removed_items<T: AggregateItemValue>(&self) -> Vec<&T> {
        self.items::<T>().removed_items()
    }

    /// 已登记的子对象类型名
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.slots.values().map(|s| s.type_name).collect();
        names.sort_unstable();
        names
    }

    fn with_items<T, R>(&mut self, f: impl FnOnce(&mut Vec<AggregateItem<T>>) -> R) -> R
    where
        T: AggregateItemValue,
    {
        let slot = self
            .slots
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Slot::new::<T>(Vec::new()));
        if let Some(entries) = slot.items.downcast_mut::<Vec<AggregateItem<T>>>() {
            return f(entries);
        }
        let mut entries = Vec::new();
        let out = f(&mut entries);
        *slot = Slot::new(entries);
        out
    }
}

impl fmt::Debug for AggregateLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateLedger")
            .field("types", &self.type_names())
            .finish()
    }
}

/// `a::b::Phone<X>` -> `Phone`
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

fn admissible<T: AggregateItemValue>(
    item: Option<T>,
    fun_name: &str,
) -> Result<T, NotificationMessage> {
    match item {
        None => Err(rejection::<T>(
            NotificationKind::ENTITY_DOES_NOT_EXIST,
            None,
            fun_name,
        )),
        Some(item) if !item.is_active() => Err(not_active(&item, fun_name)),
        Some(item) if !item.is_valid(None, None) => Err(rejection(
            NotificationKind::ENTITY_DOES_NOT_EXIST,
            Some(&item),
            fun_name,
        )),
        Some(item) => Ok(item),
    }
}

fn not_active<T: AggregateItemValue>(item: &T, fun_name: &str) -> NotificationMessage {
    NotificationMessage::builder()
        .notification(NotificationKind::ENTITY_IS_NOT_ACTIVE)
        .field_name(format!("{}.active", short_type_name::<T>()))
        .field_value(format!("{item:?}"))
        .fun_name(fun_name)
        .build()
}

fn rejection<T: AggregateItemValue>(
    kind: NotificationKind,
    item: Option<&T>,
    fun_name: &str,
) -> NotificationMessage {
    NotificationMessage::builder()
        .notification(kind)
        .field_name(short_type_name::<T>())
        .field_value(item.map_or_else(|| "null".to_string(), |i| format!("{i:?}")))
        .fun_name(fun_name)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationContext;
    use crate::value_object::ValueObject;

    #[derive(Debug, Clone, PartialEq)]
    struct Phone {
        number: String,
        active: bool,
    }

    impl Phone {
        fn new(number: &str) -> Self {
            Self {
                number: number.to_string(),
                active: true,
            }
        }
    }

    impl ValueObject for Phone {
        fn is_valid(&self, _field: Option<&str>, _ctx: Option<&mut NotificationContext>) -> bool {
            !self.number.is_empty()
        }
    }

    impl AggregateItemValue for Phone {
        fn is_active(&self) -> bool {
            self.active
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Tag(&'static str);

    impl ValueObject for Tag {}
    impl AggregateItemValue for Tag {}

    // 测试新增后删除为软删除
    #[test]
    fn add_then_remove_keeps_soft_deleted_entry() {
        let mut ledger = AggregateLedger::new();
        ledger.add(Phone::new("1")).unwrap();
        ledger.remove(Phone::new("1")).unwrap();

        assert!(ledger.current_items::<Phone>().is_empty());
        let items = ledger.items::<Phone>();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].current_status(), AggregateItemStatus::Removed);
        assert_eq!(items[0].original_status(), AggregateItemStatus::Added);
    }

    // 测试重复新增被拒绝且账本长度不变
    #[test]
    fn duplicate_add_is_rejected_once() {
        let mut ledger = AggregateLedger::new();
        ledger.add(Phone::new("1")).unwrap();
        let err = ledger.add(Phone::new("1")).unwrap_err();

        assert_eq!(err.notification(), &NotificationKind::ENTITY_ALREADY_ADDED);
        assert_eq!(err.field_name(), Some("Phone"));
        assert_eq!(err.fun_name(), Some("add_aggregate_item"));
        assert_eq!(ledger.items::<Phone>().len(), 1);
    }

    #[test]
    fn add_rejects_constructor_duplicate_and_reactivates_removed() {
        let mut ledger = AggregateLedger::new();
        assert!(ledger.construct(vec![Phone::new("1"), Phone::new("2")]).is_empty());

        assert!(ledger.add(Phone::new("1")).is_err());

        ledger.remove(Phone::new("2")).unwrap();
        ledger.add(Phone::new("2")).unwrap();

        let items = ledger.items::<Phone>();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].original_status(), AggregateItemStatus::Constructor);
        assert_eq!(items[1].current_status(), AggregateItemStatus::Added);
        assert_eq!(ledger.changed_items::<Phone>(), vec![&Phone::new("2")]);
    }

    #[test]
    fn add_rejects_missing_invalid_and_inactive_items() {
        let mut ledger = AggregateLedger::new();

        let missing = ledger.add::<Phone>(None).unwrap_err();
        assert_eq!(missing.notification(), &NotificationKind::ENTITY_DOES_NOT_EXIST);
        assert_eq!(missing.field_value(), Some("null"));

        let invalid = ledger.add(Phone::new("")).unwrap_err();
        assert_eq!(invalid.notification(), &NotificationKind::ENTITY_DOES_NOT_EXIST);

        let mut inactive = Phone::new("9");
        inactive.active = false;
        let err = ledger.add(inactive).unwrap_err();
        assert_eq!(err.notification(), &NotificationKind::ENTITY_IS_NOT_ACTIVE);
        assert_eq!(err.field_name(), Some("Phone.active"));

        assert!(ledger.items::<Phone>().is_empty());
    }

    #[test]
    fn construct_reports_inactive_items() {
        let mut ledger = AggregateLedger::new();
        let mut inactive = Phone::new("2");
        inactive.active = false;

        let rejected = ledger.construct(vec![Phone::new("1"), inactive]);
        assert_eq!(rejected.len(), 1);
        assert_eq!(ledger.items::<Phone>().len(), 1);
    }

    // 测试修改为整体替换并保留原始状态
    #[test]
    fn change_replaces_value_and_keeps_original_status() {
        let mut ledger = AggregateLedger::new();
        ledger.construct(vec![Phone::new("1")]);

        ledger
            .change(Phone::new("1"), |p| Phone {
                number: format!("{}-0", p.number),
                ..p.clone()
            })
            .unwrap();

        let items = ledger.items::<Phone>();
        assert_eq!(items[0].item().number, "1-0");
        assert_eq!(items[0].original_status(), AggregateItemStatus::Constructor);
        assert_eq!(items[0].current_status(), AggregateItemStatus::Changed);

        let err = ledger.change(Phone::new("1"), |p: &Phone| p.clone()).unwrap_err();
        assert_eq!(err.notification(), &NotificationKind::ENTITY_DOES_NOT_EXIST);
    }

    // 测试修改过的条目再次新增时重新激活为 ADDED，不追加新条目
    #[test]
    fn add_reactivates_changed_entry() {
        let mut ledger = AggregateLedger::new();
        ledger.construct(vec![Phone::new("1")]);
        ledger
            .change(Phone::new("1"), |p| Phone {
                number: "2".into(),
                ..p.clone()
            })
            .unwrap();

        ledger.add(Phone::new("2")).unwrap();

        let items = ledger.items::<Phone>();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item(), &Phone::new("2"));
        assert_eq!(items[0].original_status(), AggregateItemStatus::Constructor);
        assert_eq!(items[0].current_status(), AggregateItemStatus::Added);

        let err = ledger.add(Phone::new("2")).unwrap_err();
        assert_eq!(err.notification(), &NotificationKind::ENTITY_ALREADY_ADDED);
    }

    #[test]
    fn change_of_removed_entry_marks_it_changed() {
        let mut ledger = AggregateLedger::new();
        ledger.add(Phone::new("1")).unwrap();
        ledger.remove(Phone::new("1")).unwrap();

        ledger
            .change(Phone::new("1"), |p| Phone {
                number: "1-0".into(),
                ..p.clone()
            })
            .unwrap();

        let items = ledger.items::<Phone>();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item().number, "1-0");
        assert_eq!(items[0].original_status(), AggregateItemStatus::Added);
        assert_eq!(items[0].current_status(), AggregateItemStatus::Changed);
        assert_eq!(ledger.current_items::<Phone>().len(), 1);
    }

    #[test]
    fn remove_unknown_item_is_rejected() {
        let mut ledger = AggregateLedger::new();
        ledger.add(Tag("a")).unwrap();
        assert!(ledger.remove(Tag("b")).is_err());
        assert!(ledger.remove::<Tag>(None).is_err());

        ledger.remove(Tag("a")).unwrap();
        // 已删除的条目不能再次删除
        assert!(ledger.remove(Tag("a")).is_err());
    }

    #[test]
    fn clear_marks_every_entry_of_one_type() {
        let mut ledger = AggregateLedger::new();
        ledger.construct(vec![Tag("a"), Tag("b")]);
        ledger.add(Phone::new("1")).unwrap();

        ledger.clear::<Tag>();

        assert!(ledger.current_items::<Tag>().is_empty());
        assert_eq!(ledger.removed_items::<Tag>().len(), 2);
        assert_eq!(ledger.current_items::<Phone>().len(), 1);
        assert_eq!(ledger.type_names(), vec!["Phone", "Tag"]);
    }

    #[test]
    fn short_type_name_strips_path_and_generics() {
        assert_eq!(short_type_name::<Phone>(), "Phone");
        assert_eq!(short_type_name::<Vec<Phone>>(), "Vec");
    }
}
