//! 领域服务（Domain Service）
//!
//! 封装不属于单个实体的领域逻辑（例如唯一性检查、跨聚合查询），
//! 由调用方在校验时以 `Option<&Service>` 传入，规则通过 `RuleContext::service` 访问。
//! 实体通常以 trait object 声明服务类型：`type Service = dyn CustomerService;`。
//!
use std::sync::Arc;

/// 领域服务标记
pub trait DomainService: Send + Sync {}

impl<T: DomainService + ?Sized> DomainService for Arc<T> {}

impl<T: DomainService + ?Sized> DomainService for Box<T> {}

/// 不需要领域服务的实体使用的占位类型
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoService;

impl DomainService for NoService {}
