use super::{EntityMode, EntityModel};
use crate::aggregate::{AggregateItem, AggregateLedger};
use crate::domain_event::DomainEvent;
use crate::notification::{NotificationContext, NotificationMessage};
use crate::value_object::{AggregateItemValue, AggregateValueObject, Id, ValueObject};

type QueuedValueObject = (Option<String>, Box<dyn ValueObject + Send + Sync>);
type QueuedAggregate<S> = (Option<String>, Box<dyn AggregateValueObject<S>>);

/// 单次校验过程的瞬时状态；每次过程开始与结束时重置
pub(crate) struct PassState<S: ?Sized + Sync> {
    pub(crate) mode: EntityMode,
    pub(crate) context: NotificationContext,
    pub(crate) value_objects: Vec<QueuedValueObject>,
    pub(crate) aggregates: Vec<QueuedAggregate<S>>,
    pub(crate) events: Vec<DomainEvent>,
    pub(crate) attached: Vec<NotificationContext>,
}

impl<S: ?Sized + Sync> PassState<S> {
    pub(crate) fn new(context_name: &str) -> Self {
        Self {
            mode: EntityMode::Display,
            context: NotificationContext::new(context_name),
            value_objects: Vec::new(),
            aggregates: Vec::new(),
            events: Vec::new(),
            attached: Vec::new(),
        }
    }

    pub(crate) fn reset(&mut self, mode: EntityMode) {
        self.mode = mode;
        self.context.clear_notifications();
        self.value_objects.clear();
        self.aggregates.clear();
        self.events.clear();
        self.attached.clear();
    }
}

/// 规则执行时可访问的实体视图
pub struct RuleContext<'a, M: EntityModel> {
    pub(crate) mode: EntityMode,
    pub(crate) service: Option<&'a M::Service>,
    pub(crate) id: &'a mut Option<Id>,
    pub(crate) model: &'a mut M,
    pub(crate) ledger: &'a mut AggregateLedger,
    pub(crate) pass: &'a mut PassState<M::Service>,
}

impl<'a, M: EntityModel> RuleContext<'a, M> {
    pub fn mode(&self) -> EntityMode {
        self.mode
    }

    pub fn service(&self) -> Option<&'a M::Service> {
        self.service
    }

    pub fn model(&self) -> &M {
        &*self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut *self.model
    }

    pub fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    pub fn set_id(&mut self, id: impl Into<Option<Id>>) {
        *self.id = id.into();
    }

    pub fn add_notification(&mut self, message: NotificationMessage) {
        self.pass.context.add_notification(message);
    }

    /// 附加外部产生的通知上下文（例如嵌套实体的校验结果）
    pub fn add_notification_context(&mut self, context: NotificationContext) {
        self.pass.attached.push(context);
    }

    /// 排队校验值对象，在规则执行完之后统一执行
    pub fn validate(&mut self, field_name: &str, value: impl ValueObject + Send + Sync + 'static) {
        self.pass
            .value_objects
            .push((Some(field_name.to_string()), Box::new(value)));
    }

    /// 排队校验聚合子对象，在值对象之后执行
    pub fn validate_aggregate(
        &mut self,
        field_name: &str,
        value: impl AggregateValueObject<M::Service> + 'static,
    ) {
        self.pass
            .aggregates
            .push((Some(field_name.to_string()), Box::new(value)));
    }

    /// 排队校验账本中某类型的全部当前项
    pub fn validate_aggregate_items<T>(&mut self, field_name: &str)
    where
        T: AggregateItemValue + AggregateValueObject<M::Service>,
    {
        let current: Vec<T> = self
            .ledger
            .current_items::<T>()
            .into_iter()
            .cloned()
            .collect();
        for item in current {
            self.validate_aggregate(field_name, item);
        }
    }

    pub fn register_event(&mut self, event: DomainEvent) {
        self.pass.events.push(event);
    }

    /// 新增聚合项；被拒绝时记录通知并返回 `false`
    pub fn add_aggregate_item<T: AggregateItemValue>(
        &mut self,
        item: impl Into<Option<T>>,
    ) -> bool {
        let outcome = self.ledger.add::<T>(item);
        self.record(outcome)
    }

    pub fn change_aggregate_item<T: AggregateItemValue>(
        &mut self,
        item: impl Into<Option<T>>,
        transform: impl FnOnce(&T) -> T,
    ) -> bool {
        let outcome = self.ledger.change::<T>(item, transform);
        self.record(outcome)
    }

    pub fn remove_aggregate_item<T: AggregateItemValue>(
        &mut self,
        item: impl Into<Option<T>>,
    ) -> bool {
        let outcome = self.ledger.remove::<T>(item);
        self.record(outcome)
    }

    pub fn clear_aggregate_items<T: AggregateItemValue>(&mut self) {
        self.ledger.clear::<T>();
    }

    pub fn aggregate_items<T: AggregateItemValue>(&self) -> &[AggregateItem<T>] {
        self.ledger.items::<T>()
    }

    pub fn ledger(&self) -> &AggregateLedger {
        &*self.ledger
    }

    fn record(&mut self, outcome: Result<(), NotificationMessage>) -> bool {
        match outcome {
            Ok(()) => true,
            Err(message) => {
                self.pass.context.add_notification(message);
                false
            }
        }
    }
}
