//! 仓储协议
//!
//! - `WritableRepository`：具体存储后端实现的四个数据函数与提交后的发布钩子；
//! - `UnitOfWork`：原子、不透明的事务边界；
//! - `RepositoryExt`：编排 `begin → *_data → commit → publish_*`，出错时回滚。
//!
use super::publish;
use crate::aggregate::short_type_name;
use crate::domain_event::BusinessContext;
use crate::entity::{Deletable, Entity, EntityModel, Insertable, Updatable};
use crate::error::{DomainError, DomainResult};
use crate::notification::{NotificationContext, NotificationKind, NotificationMessage};
use crate::value_object::Id;
use async_trait::async_trait;
use std::sync::Arc;

/// 可写仓储：只接受有效实体快照
///
/// 未覆盖的数据函数以 `RepositoryFunctionNotImplementedNotification` 失败。
#[async_trait]
pub trait WritableRepository<M: EntityModel>: Send + Sync {
    /// 仓储名，用于通知中的函数名
    fn repository_name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    async fn insert_data(&self, insertable: &Insertable<M::Insertable>) -> DomainResult<Id> {
        let _ = insertable;
        Err(not_implemented(self.repository_name(), "insert_data"))
    }

    async fn update_data(&self, updatable: &Updatable<M::Updatable>) -> DomainResult<()> {
        let _ = updatable;
        Err(not_implemented(self.repository_name(), "update_data"))
    }

    async fn delete_data(&self, deletable: &Deletable) -> DomainResult<()> {
        let _ = deletable;
        Err(not_implemented(self.repository_name(), "delete_data"))
    }

    async fn find_data_by_id(&self, id: &Id) -> DomainResult<Option<Entity<M>>> {
        let _ = id;
        Err(not_implemented(self.repository_name(), "find_data_by_id"))
    }

    async fn publish_insert(
        &self,
        insertable: &Insertable<M::Insertable>,
        id: &Id,
        biz: &BusinessContext,
    ) {
        publish_written("Insert", M::NAME, Some(id), insertable.events(), biz);
    }

    async fn publish_update(&self, updatable: &Updatable<M::Updatable>, biz: &BusinessContext) {
        publish_written(
            "Update",
            M::NAME,
            Some(updatable.id()),
            updatable.events(),
            biz,
        );
    }

    async fn publish_delete(&self, deletable: &Deletable, biz: &BusinessContext) {
        publish_written(
            "Delete",
            M::NAME,
            Some(deletable.id()),
            deletable.events(),
            biz,
        );
    }
}

#[async_trait]
impl<M, T> WritableRepository<M> for Arc<T>
where
    M: EntityModel,
    T: WritableRepository<M> + ?Sized,
{
    fn repository_name(&self) -> &'static str {
        (**self).repository_name()
    }

    async fn insert_data(&self, insertable: &Insertable<M::Insertable>) -> DomainResult<Id> {
        (**self).insert_data(insertable).await
    }

    async fn update_data(&self, updatable: &Updatable<M::Updatable>) -> DomainResult<()> {
        (**self).update_data(updatable).await
    }

    async fn delete_data(&self, deletable: &Deletable) -> DomainResult<()> {
        (**self).delete_data(deletable).await
    }

    async fn find_data_by_id(&self, id: &Id) -> DomainResult<Option<Entity<M>>> {
        (**self).find_data_by_id(id).await
    }

    async fn publish_insert(
        &self,
        insertable: &Insertable<M::Insertable>,
        id: &Id,
        biz: &BusinessContext,
    ) {
        (**self).publish_insert(insertable, id, biz).await
    }

    async fn publish_update(&self, updatable: &Updatable<M::Updatable>, biz: &BusinessContext) {
        (**self).publish_update(updatable, biz).await
    }

    async fn publish_delete(&self, deletable: &Deletable, biz: &BusinessContext) {
        (**self).publish_delete(deletable, biz).await
    }
}

/// 工作单元：仓储写操作的事务边界，默认无操作
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    async fn begin(&self) -> DomainResult<()> {
        Ok(())
    }

    async fn commit(&self) -> DomainResult<()> {
        Ok(())
    }

    async fn rollback(&self) -> DomainResult<()> {
        Ok(())
    }
}

#[async_trait]
impl<T: UnitOfWork + ?Sized> UnitOfWork for Arc<T> {
    async fn begin(&self) -> DomainResult<()> {
        (**self).begin().await
    }

    async fn commit(&self) -> DomainResult<()> {
        (**self).commit().await
    }

    async fn rollback(&self) -> DomainResult<()> {
        (**self).rollback().await
    }
}

/// 在工作单元内执行仓储操作；数据函数或提交失败时回滚，发布只在提交成功之后发生
#[async_trait]
pub trait RepositoryExt<M: EntityModel>: WritableRepository<M> + UnitOfWork {
    async fn insert(
        &self,
        insertable: &Insertable<M::Insertable>,
        biz: &BusinessContext,
    ) -> DomainResult<Id> {
        self.begin().await?;
        let id = match self.insert_data(insertable).await {
            Ok(id) => id,
            Err(err) => return Err(rollback_with(self, err).await),
        };
        if let Err(err) = self.commit().await {
            return Err(rollback_with(self, err).await);
        }
        self.publish_insert(insertable, &id, biz).await;
        Ok(id)
    }

    async fn update(
        &self,
        updatable: &Updatable<M::Updatable>,
        biz: &BusinessContext,
    ) -> DomainResult<()> {
        self.begin().await?;
        if let Err(err) = self.update_data(updatable).await {
            return Err(rollback_with(self, err).await);
        }
        if let Err(err) = self.commit().await {
            return Err(rollback_with(self, err).await);
        }
        self.publish_update(updatable, biz).await;
        Ok(())
    }

    async fn delete(&self, deletable: &Deletable, biz: &BusinessContext) -> DomainResult<()> {
        self.begin().await?;
        if let Err(err) = self.delete_data(deletable).await {
            return Err(rollback_with(self, err).await);
        }
        if let Err(err) = self.commit().await {
            return Err(rollback_with(self, err).await);
        }
        self.publish_delete(deletable, biz).await;
        Ok(())
    }

    async fn find_by_id(&self, id: &Id) -> DomainResult<Option<Entity<M>>> {
        self.begin().await?;
        let found = match self.find_data_by_id(id).await {
            Ok(found) => found,
            Err(err) => return Err(rollback_with(self, err).await),
        };
        if let Err(err) = self.commit().await {
            return Err(rollback_with(self, err).await);
        }
        Ok(found)
    }
}

impl<M, R> RepositoryExt<M> for R
where
    M: EntityModel,
    R: WritableRepository<M> + UnitOfWork + ?Sized,
{
}

// 回滚失败只记录日志，调用方拿到的始终是原始错误
async fn rollback_with<U: UnitOfWork + ?Sized>(uow: &U, err: DomainError) -> DomainError {
    if let Err(rollback_err) = uow.rollback().await {
        tracing::warn!(error = %rollback_err, original = %err, "rollback failed");
    }
    err
}

fn publish_written(
    action: &str,
    entity_name: &str,
    id: Option<&Id>,
    events: &[crate::domain_event::DomainEvent],
    biz: &BusinessContext,
) {
    let correlation_id = biz.correlation_id().unwrap_or_default();
    publish::log_audit(action, entity_name, id, correlation_id);
    publish::log_events(events, correlation_id);
}

fn not_implemented(repository: &str, function: &str) -> DomainError {
    let mut ctx = NotificationContext::new(repository);
    ctx.add_notification(
        NotificationMessage::builder()
            .notification(NotificationKind::REPOSITORY_FUNCTION_NOT_IMPLEMENTED)
            .fun_name(format!("{repository}.{function}()"))
            .build(),
    );
    DomainError::notification(ctx)
}
