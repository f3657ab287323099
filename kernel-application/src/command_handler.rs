use crate::{command::Command, context::AppContext, error::AppResult};
use async_trait::async_trait;

/// 命令处理器；以引用接收命令，便于多个处理器响应同一命令
#[async_trait]
pub trait CommandHandler<C>: Send + Sync
where
    C: Command,
{
    async fn handle(&self, ctx: &AppContext, cmd: &C) -> AppResult<C::Output>;
}
