//! 聚合项（Aggregate Item）
//!
//! 聚合根拥有若干集合型子值对象，每个子对象独立跟踪“加载/新增/修改/删除”状态：
//! - `AggregateItemStatus` / `AggregateItem`：条目与其原始、当前状态；
//! - `AggregateLedger`：按子对象类型分组的账本，负责新增、修改、软删除与清空；
//! - `AggregateItems`：面向持久化适配器的增量投影。
//!
mod item;
mod ledger;

pub use item::{AggregateItem, AggregateItemStatus, AggregateItems};
pub use ledger::AggregateLedger;

pub(crate) use ledger::short_type_name;
