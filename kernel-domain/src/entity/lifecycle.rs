use super::context::{PassState, RuleContext};
use super::rule::RuleSet;
use super::snapshot::{Deletable, Insertable, Updatable};
use super::{Capabilities, EntityMode, EntityModel};
use crate::aggregate::{AggregateItem, AggregateLedger};
use crate::domain_event::DomainEvent;
use crate::error::{DomainError, DomainResult};
use crate::notification::{NotificationContext, NotificationKind, NotificationMessage};
use crate::value_object::{AggregateItemValue, Id, ValueObject};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 实体（聚合根）
///
/// 持久字段只有标识、模型、能力、账本、字段重命名与待处理的变更通知；
/// 模式、通知、校验队列与事件属于单次校验过程，在每次
/// `is_valid`/`get_insertable`/`get_updatable`/`get_deletable` 开始与结束时重置。
///
/// 单个实例同一时间只能有一个校验过程（`&mut self` 保证）。
pub struct Entity<M: EntityModel> {
    id: Option<Id>,
    model: M,
    capabilities: Capabilities,
    rules: Arc<RuleSet<M>>,
    ledger: AggregateLedger,
    field_names_to_change: HashMap<String, String>,
    pending: NotificationContext,
    pass: PassState<M::Service>,
}

impl<M: EntityModel> Entity<M> {
    /// 新实体（尚无标识）
    pub fn new(model: M) -> Self {
        Self {
            id: None,
            model,
            capabilities: M::capabilities(),
            rules: Arc::new(M::rules()),
            ledger: AggregateLedger::new(),
            field_names_to_change: HashMap::new(),
            pending: NotificationContext::new(M::NAME),
            pass: PassState::new(M::NAME),
        }
    }

    /// 从持久化数据重建
    pub fn reconstruct(id: impl Into<Id>, model: M) -> Self {
        let mut entity = Self::new(model);
        entity.id = Some(id.into());
        entity
    }

    /// 覆盖模型声明的能力
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    pub fn set_id(&mut self, id: impl Into<Option<Id>>) {
        self.id = id.into();
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    pub fn mode(&self) -> EntityMode {
        self.pass.mode
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn rules(&self) -> &RuleSet<M> {
        &self.rules
    }

    pub fn ledger(&self) -> &AggregateLedger {
        &self.ledger
    }

    /// 当前过程的通知；过程之外总为空
    pub fn notification_context(&self) -> &NotificationContext {
        &self.pass.context
    }

    /// 过程之外被拒绝的账本变更，在下一次过程中汇报
    pub fn pending_notifications(&self) -> &NotificationContext {
        &self.pending
    }

    pub fn add_field_name_to_change(
        &mut self,
        original_field_name: impl Into<String>,
        new_field_name: impl Into<String>,
    ) {
        self.field_names_to_change
            .insert(original_field_name.into(), new_field_name.into());
    }

    pub fn add_field_names_to_change<K, V>(&mut self, names: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.field_names_to_change
            .extend(names.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    // ---- 聚合项 ----

    /// 装载持久化的聚合项
    pub fn construct_aggregate_items<T: AggregateItemValue>(
        &mut self,
        items: impl IntoIterator<Item = T>,
    ) {
        let rejected = self.ledger.construct(items);
        self.pending.extend(rejected);
    }

    pub fn add_aggregate_item<T: AggregateItemValue>(
        &mut self,
        item: impl Into<Option<T>>,
    ) -> bool {
        let outcome = self.ledger.add::<T>(item);
        self.keep_pending(outcome)
    }

    pub fn change_aggregate_item<T: AggregateItemValue>(
        &mut self,
        item: impl Into<Option<T>>,
        transform: impl FnOnce(&T) -> T,
    ) -> bool {
        let outcome = self.ledger.change::<T>(item, transform);
        self.keep_pending(outcome)
    }

    pub fn remove_aggregate_item<T: AggregateItemValue>(
        &mut self,
        item: impl Into<Option<T>>,
    ) -> bool {
        let outcome = self.ledger.remove::<T>(item);
        self.keep_pending(outcome)
    }

    pub fn clear_aggregate_items<T: AggregateItemValue>(&mut self) {
        self.ledger.clear::<T>();
    }

    pub fn aggregate_items<T: AggregateItemValue>(&self) -> &[AggregateItem<T>] {
        self.ledger.items::<T>()
    }

    fn keep_pending(&mut self, outcome: Result<(), NotificationMessage>) -> bool {
        match outcome {
            Ok(()) => true,
            Err(message) => {
                self.pending.add_notification(message);
                false
            }
        }
    }

    // ---- 校验过程 ----

    /// 不产生快照、不失败的预检
    ///
    /// 通知被复制到 `ctx`；返回是否新增了通知（`true` 表示存在问题）。待处理的变更通知保持不变。
    pub async fn is_valid(
        &mut self,
        mode: EntityMode,
        service: Option<&M::Service>,
        ctx: &mut NotificationContext,
    ) -> bool {
        let failed = self.run_pass(mode, service).await;
        self.finish_pass();
        let before = ctx.len();
        for context in failed {
            ctx.extend(context.notifications().iter().cloned());
        }
        ctx.len() > before
    }

    /// 校验新增；成功时返回新增快照
    pub async fn get_insertable(
        &mut self,
        service: Option<&M::Service>,
    ) -> DomainResult<Insertable<M::Insertable>> {
        let failed = self.run_pass(EntityMode::Insert, service).await;
        let events = self.consume_pass();
        check_notifications(failed)?;
        Ok(Insertable::new(
            M::NAME,
            self.id.clone(),
            self.model.insertable(),
            events,
        ))
    }

    /// 校验修改；成功时返回修改快照
    pub async fn get_updatable(
        &mut self,
        service: Option<&M::Service>,
    ) -> DomainResult<Updatable<M::Updatable>> {
        let failed = self.run_pass(EntityMode::Update, service).await;
        let events = self.consume_pass();
        check_notifications(failed)?;
        let id = self.require_id(NotificationKind::UNABLE_TO_UPDATE_WITHOUT_ID, "get_updatable")?;
        Ok(Updatable::new(M::NAME, id, self.model.updatable(), events))
    }

    /// 校验删除；成功时返回删除快照（整个模型的 JSON）
    pub async fn get_deletable(&mut self, service: Option<&M::Service>) -> DomainResult<Deletable> {
        let failed = self.run_pass(EntityMode::Delete, service).await;
        let events = self.consume_pass();
        check_notifications(failed)?;
        let id = self.require_id(NotificationKind::UNABLE_TO_DELETE_WITHOUT_ID, "get_deletable")?;
        let deleted_fields = serde_json::to_value(&self.model)?;
        Ok(Deletable::new(M::NAME, id, deleted_fields, events))
    }

    /// 执行一次校验过程，返回非空的通知上下文（为空表示通过）
    ///
    /// 顺序：服务检查（唯一的提前终止）→ 规则 → 能力 → 标识 → 待处理通知
    /// → 值对象 → 聚合子对象 → 字段重命名。
    async fn run_pass(
        &mut self,
        mode: EntityMode,
        service: Option<&M::Service>,
    ) -> Vec<NotificationContext> {
        self.pass.reset(mode);
        tracing::trace!(entity = M::NAME, %mode, "validation pass started");

        match mode {
            EntityMode::Display => return Vec::new(),
            EntityMode::Unknown => {
                self.pass.context.add_notification(
                    NotificationMessage::builder()
                        .notification(NotificationKind::INVALID_ENTITY_MODE)
                        .field_name("mode")
                        .field_value(mode.to_string())
                        .fun_name("is_valid")
                        .build(),
                );
                return self.collect_failed();
            }
            EntityMode::Insert | EntityMode::Update | EntityMode::Delete => {}
        }

        let fun_name = pass_fun_name(mode);

        if self.capabilities.service_required() && service.is_none() {
            self.pass.context.add_notification(
                NotificationMessage::builder()
                    .notification(NotificationKind::SERVICE_IS_REQUIRED)
                    .field_name("service")
                    .fun_name(fun_name)
                    .build(),
            );
            self.report_pending();
            return self.collect_failed();
        }

        let rules = Arc::clone(&self.rules);
        for named in rules.for_mode(mode) {
            tracing::trace!(entity = M::NAME, rule = %named.name, "applying rule");
            let mut ctx = RuleContext {
                mode,
                service,
                id: &mut self.id,
                model: &mut self.model,
                ledger: &mut self.ledger,
                pass: &mut self.pass,
            };
            named.rule.apply(&mut ctx).await;
        }

        self.check_capability(mode, fun_name);
        self.check_identity(mode, fun_name);
        self.report_pending();

        let value_objects = std::mem::take(&mut self.pass.value_objects);
        for (field_name, value) in value_objects {
            value.is_valid(field_name.as_deref(), Some(&mut self.pass.context));
        }

        let aggregates = std::mem::take(&mut self.pass.aggregates);
        for (field_name, value) in aggregates {
            value
                .validate(service, mode, field_name.as_deref(), &mut self.pass.context)
                .await;
        }

        self.collect_failed()
    }

    fn check_capability(&mut self, mode: EntityMode, fun_name: &'static str) {
        let (allowed, field, kind) = match mode {
            EntityMode::Insert => (
                self.capabilities.insertable(),
                "insertable",
                NotificationKind::INSERT_NOT_ALLOWED,
            ),
            EntityMode::Update => (
                self.capabilities.updatable(),
                "updatable",
                NotificationKind::UPDATE_NOT_ALLOWED,
            ),
            EntityMode::Delete => (
                self.capabilities.deletable(),
                "deletable",
                NotificationKind::DELETE_NOT_ALLOWED,
            ),
            EntityMode::Unknown | EntityMode::Display => return,
        };
        if !allowed {
            self.pass.context.add_notification(
                NotificationMessage::builder()
                    .notification(kind)
                    .field_name(field)
                    .field_value("false")
                    .fun_name(fun_name)
                    .build(),
            );
        }
    }

    fn check_identity(&mut self, mode: EntityMode, fun_name: &'static str) {
        let missing = match mode {
            EntityMode::Insert => {
                if let Some(id) = &self.id {
                    self.pass.context.add_notification(
                        NotificationMessage::builder()
                            .notification(NotificationKind::UNABLE_TO_INSERT_WITH_ID)
                            .field_name("id")
                            .field_value(id.value().clone())
                            .fun_name(fun_name)
                            .build(),
                    );
                }
                return;
            }
            EntityMode::Update => NotificationKind::UNABLE_TO_UPDATE_WITHOUT_ID,
            EntityMode::Delete => NotificationKind::UNABLE_TO_DELETE_WITHOUT_ID,
            EntityMode::Unknown | EntityMode::Display => return,
        };
        match &self.id {
            Some(id) => {
                id.is_valid(Some("id"), Some(&mut self.pass.context));
            }
            None => self.pass.context.add_notification(
                NotificationMessage::builder()
                    .notification(missing)
                    .field_name("id")
                    .fun_name(fun_name)
                    .build(),
            ),
        }
    }

    fn report_pending(&mut self) {
        self.pass
            .context
            .extend(self.pending.notifications().iter().cloned());
    }

    fn collect_failed(&mut self) -> Vec<NotificationContext> {
        let mut failed = Vec::new();
        if !self.pass.context.is_empty() {
            failed.push(self.pass.context.copy(None));
        }
        failed.extend(self.pass.attached.drain(..).filter(|c| !c.is_empty()));
        for context in &mut failed {
            for (original, new) in &self.field_names_to_change {
                context.change_field_name(original, new);
            }
        }
        failed
    }

    fn require_id(&self, kind: NotificationKind, fun_name: &str) -> DomainResult<Id> {
        self.id.clone().ok_or_else(|| {
            let mut ctx = NotificationContext::new(M::NAME);
            ctx.add_notification(
                NotificationMessage::builder()
                    .notification(kind)
                    .field_name("id")
                    .fun_name(fun_name)
                    .build(),
            );
            DomainError::notification(ctx)
        })
    }

    /// 结束预检过程：回到 DISPLAY，保留待处理通知
    fn finish_pass(&mut self) {
        self.pass.reset(EntityMode::Display);
    }

    /// 结束产生快照的过程：取走事件，清空待处理通知并回到 DISPLAY
    fn consume_pass(&mut self) -> Vec<DomainEvent> {
        let events = std::mem::take(&mut self.pass.events);
        self.pending.clear_notifications();
        self.pass.reset(EntityMode::Display);
        events
    }
}

fn pass_fun_name(mode: EntityMode) -> &'static str {
    match mode {
        EntityMode::Insert => "get_insertable",
        EntityMode::Update => "get_updatable",
        EntityMode::Delete => "get_deletable",
        EntityMode::Unknown | EntityMode::Display => "is_valid",
    }
}

/// 过程边界：存在通知时整体上抛
fn check_notifications(failed: Vec<NotificationContext>) -> DomainResult<()> {
    if failed.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Notification { contexts: failed })
    }
}

impl<M: EntityModel + fmt::Debug> fmt::Debug for Entity<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &M::NAME)
            .field("id", &self.id)
            .field("model", &self.model)
            .field("capabilities", &self.capabilities)
            .field("mode", &self.pass.mode)
            .field("ledger", &self.ledger)
            .finish()
    }
}
