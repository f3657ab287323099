//! 持久化协议（persist）
//!
//! 仓储只接受有效实体快照（`Insertable`/`Updatable`/`Deletable`），
//! 写操作在工作单元内执行，提交成功后再发布审计记录与领域事件：
//! - `WritableRepository`：具体存储后端实现的数据函数；
//! - `UnitOfWork`：事务边界，默认无操作；
//! - `RepositoryExt`：`begin → *_data → commit → publish_*` 的编排，失败时回滚；
//! - `publish`：审计与事件写入 `tracing` 日志。
//!
//! 具体存储后端（如 Postgres）由上层提供实现并注入。
//!
mod publish;
mod repository;

pub use publish::{log_audit, log_event, log_events};
pub use repository::{RepositoryExt, UnitOfWork, WritableRepository};
