//! 应用内核（kernel-application）
//!
//! 命令/查询调度与失败转换：
//! - `Pipeline`：注册处理器并把每次调用的结果规整为 `DispatchResult`；
//! - `translation`：把通知上下文翻译为对外 DTO；
//! - `publish`：有效实体的审计与事件日志；
//! - `telemetry`：可选的 `tracing` 订阅者初始化。
//!
pub mod command;
pub mod command_handler;
pub mod config;
pub mod context;
pub mod dto;
pub mod error;
pub mod pipeline;
pub mod publish;
pub mod query;
pub mod query_handler;
pub mod result;
pub mod telemetry;
pub mod translation;

pub use pipeline::Pipeline;
pub use result::{DispatchResult, DispatchResults};
