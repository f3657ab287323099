use super::context::RuleContext;
use super::{EntityMode, EntityModel};
use async_trait::async_trait;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// 规则作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleScope {
    /// 业务规则：每种写模式都执行
    Always,
    /// 新增与修改共享的规则
    InsertOrUpdate,
    Insert,
    Update,
    Delete,
}

impl RuleScope {
    pub fn applies_to(self, mode: EntityMode) -> bool {
        match self {
            Self::Always => matches!(
                mode,
                EntityMode::Insert | EntityMode::Update | EntityMode::Delete
            ),
            Self::InsertOrUpdate => matches!(mode, EntityMode::Insert | EntityMode::Update),
            Self::Insert => mode == EntityMode::Insert,
            Self::Update => mode == EntityMode::Update,
            Self::Delete => mode == EntityMode::Delete,
        }
    }

    // 共享规则先于特定规则执行
    fn rank(self) -> u8 {
        match self {
            Self::Always => 0,
            Self::InsertOrUpdate => 1,
            Self::Insert | Self::Update | Self::Delete => 2,
        }
    }
}

/// 实体校验规则
///
/// 规则不返回错误：违反时通过 `RuleContext::add_notification` 记录通知，
/// 以便一次调用汇报所有问题。
#[async_trait]
pub trait Rule<M: EntityModel>: Send + Sync {
    async fn apply(&self, ctx: &mut RuleContext<'_, M>);
}

#[async_trait]
impl<M, T> Rule<M> for Arc<T>
where
    M: EntityModel,
    T: Rule<M> + ?Sized,
{
    async fn apply(&self, ctx: &mut RuleContext<'_, M>) {
        (**self).apply(ctx).await
    }
}

/// 以同步闭包实现的规则
pub struct FnRule<F>(F);

impl<F> FnRule<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<M, F> Rule<M> for FnRule<F>
where
    M: EntityModel,
    F: Fn(&mut RuleContext<'_, M>) + Send + Sync,
{
    async fn apply(&self, ctx: &mut RuleContext<'_, M>) {
        (self.0)(ctx)
    }
}

pub(crate) struct NamedRule<M: EntityModel> {
    pub(crate) scope: RuleScope,
    pub(crate) name: Cow<'static, str>,
    pub(crate) rule: Arc<dyn Rule<M>>,
}

/// 有序、具名的规则集合
///
/// 执行顺序固定：`Always` → `InsertOrUpdate` → 当前模式的特定规则；
/// 同一作用域内按注册顺序执行。
pub struct RuleSet<M: EntityModel> {
    rules: Vec<NamedRule<M>>,
}

impl<M: EntityModel> Default for RuleSet<M> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<M: EntityModel> RuleSet<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册规则
    pub fn rule(
        mut self,
        scope: RuleScope,
        name: impl Into<Cow<'static, str>>,
        rule: impl Rule<M> + 'static,
    ) -> Self {
        self.rules.push(NamedRule {
            scope,
            name: name.into(),
            rule: Arc::new(rule),
        });
        self
    }

    pub fn always<F>(self, name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(&mut RuleContext<'_, M>) + Send + Sync + 'static,
    {
        self.rule(RuleScope::Always, name, FnRule::new(f))
    }

    pub fn on_insert_or_update<F>(self, name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(&mut RuleContext<'_, M>) + Send + Sync + 'static,
    {
        self.rule(RuleScope::InsertOrUpdate, name, FnRule::new(f))
    }

    pub fn on_insert<F>(self, name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(&mut RuleContext<'_, M>) + Send + Sync + 'static,
    {
        self.rule(RuleScope::Insert, name, FnRule::new(f))
    }

    pub fn on_update<F>(self, name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(&mut RuleContext<'_, M>) + Send + Sync + 'static,
    {
        self.rule(RuleScope::Update, name, FnRule::new(f))
    }

    pub fn on_delete<F>(self, name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(&mut RuleContext<'_, M>) + Send + Sync + 'static,
    {
        self.rule(RuleScope::Delete, name, FnRule::new(f))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 某模式下将要执行的规则，按执行顺序
    pub(crate) fn for_mode(&self, mode: EntityMode) -> Vec<&NamedRule<M>> {
        let mut selected: Vec<_> = self
            .rules
            .iter()
            .filter(|r| r.scope.applies_to(mode))
            .collect();
        // 稳定排序，保留同作用域内的注册顺序
        selected.sort_by_key(|r| r.scope.rank());
        selected
    }

    /// 某模式下的规则名，按执行顺序
    pub fn names_for(&self, mode: EntityMode) -> Vec<&str> {
        self.for_mode(mode)
            .into_iter()
            .map(|r| r.name.as_ref())
            .collect()
    }
}

impl<M: EntityModel> fmt::Debug for RuleSet<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| (r.scope, &r.name)))
            .finish()
    }
}
