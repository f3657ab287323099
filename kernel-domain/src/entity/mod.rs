//! 实体（Entity）生命周期引擎
//!
//! 实体在 DISPLAY（静止态）与 INSERT/UPDATE/DELETE 之间切换，每次校验过程：
//! 1. 重置瞬时状态并进入目标模式；
//! 2. 需要领域服务却未提供时立即失败（唯一的提前终止）；
//! 3. 依次执行 `Always`、`InsertOrUpdate` 与当前模式的规则；
//! 4. 检查能力（insertable/updatable/deletable）与标识；
//! 5. 执行排队的值对象与聚合子对象校验；
//! 6. 存在任何通知则以 `DomainError::Notification` 整体上抛，否则返回不可变快照。
//!
//! 除服务检查外，失败是累积的：一次调用会汇报全部问题。
//!
mod capabilities;
mod context;
mod lifecycle;
mod mode;
mod rule;
mod snapshot;

pub use capabilities::Capabilities;
pub use context::RuleContext;
pub use lifecycle::Entity;
pub use mode::EntityMode;
pub use rule::{FnRule, Rule, RuleScope, RuleSet};
pub use snapshot::{Deletable, Insertable, Updatable, ValidEntity};

use crate::domain_service::DomainService;
use serde::Serialize;

/// 实体模型描述：持久字段、能力与规则
///
/// - `Service`：校验规则可用的领域服务，不需要时使用 `NoService`；
/// - `Insertable`/`Updatable`：新增/修改时允许写出的字段投影。
pub trait EntityModel: Serialize + Send + Sync + Sized + 'static {
    /// 实体类型名，同时作为通知上下文名
    const NAME: &'static str;

    type Service: DomainService + ?Sized;
    type Insertable: Serialize + Send + Sync;
    type Updatable: Serialize + Send + Sync;

    fn capabilities() -> Capabilities {
        Capabilities::default()
    }

    fn rules() -> RuleSet<Self> {
        RuleSet::new()
    }

    fn insertable(&self) -> Self::Insertable;

    fn updatable(&self) -> Self::Updatable;
}

/// 某实体模型对应的有效实体类型
pub type ValidEntityOf<M> =
    ValidEntity<<M as EntityModel>::Insertable, <M as EntityModel>::Updatable>;
