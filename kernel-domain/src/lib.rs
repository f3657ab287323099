//! 领域内核（kernel-domain）
//!
//! 以通知模式（Notification Pattern）为中心的领域层构件：
//! - 值对象（`value_object`）与枚举值对象，`Id` 标识；
//! - 通知（`notification`）：累积而非抛出的校验失败；
//! - 实体（`entity`）：模式驱动的生命周期、规则集与不可变快照；
//! - 聚合项（`aggregate`）：子值对象集合的增量账本；
//! - 领域事件（`domain_event`）与业务上下文；
//! - 持久化协议（`persist`）：仓储、工作单元与提交后的发布。
//!
//! 典型用法：
//! 1. 为模型实现 `EntityModel`，在 `rules()` 中声明校验规则；
//! 2. 以 `Entity::new`/`Entity::reconstruct` 包装模型；
//! 3. 调用 `get_insertable`/`get_updatable`/`get_deletable` 获取快照；
//! 4. 交给 `RepositoryExt` 在工作单元内写入并发布事件。
//!
pub mod aggregate;
pub mod domain_event;
pub mod domain_service;
pub mod entity;
pub mod error;
pub mod notification;
pub mod persist;
pub mod value_object;

pub use kernel_macros::{enum_value_object, value_object};

// 允许在本 crate 内部通过 ::kernel_domain 进行自引用，
// 以便过程宏在本 crate 中也能解析到 ::kernel_domain 路径。
extern crate self as kernel_domain;
