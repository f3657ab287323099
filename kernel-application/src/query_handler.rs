use crate::{context::AppContext, error::AppResult, query::Query};
use async_trait::async_trait;

#[async_trait]
pub trait QueryHandler<Q>: Send + Sync
where
    Q: Query,
{
    async fn handle(&self, ctx: &AppContext, q: Q) -> AppResult<Q::Output>;
}
