//! 调度管线（Pipeline）
//!
//! - 查询：每个类型一个处理器，重复注册报 `AlreadyRegisteredQuery`；
//! - 命令：每个类型可注册多个处理器（扇出），并发执行，每个处理器各得一个结果；
//! - 每次处理器调用都经过统一的失败转换：
//!   通知 → `Failure`（翻译后），持久化失败 → 通用 `Failure`，其余错误与 panic → `Exception`。
//!
//! 注册表在组装阶段写入，调度期间只读。
//!
use crate::command::Command;
use crate::command_handler::CommandHandler;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::query::Query;
use crate::query_handler::QueryHandler;
use crate::result::DispatchResult;
use crate::translation::Translator;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures_util::FutureExt;
use futures_util::future::join_all;
use kernel_domain::notification::{NotificationContext, NotificationKind, NotificationMessage};
use std::any::{Any, TypeId, type_name, type_name_of_val};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

type BoxAnySend = Box<dyn Any + Send>;

type HandlerFuture<'a> = Pin<Box<dyn Future<Output = AppResult<BoxAnySend>> + Send + 'a>>;

type QueryHandlerFn =
    Arc<dyn for<'a> Fn(BoxAnySend, &'a AppContext) -> HandlerFuture<'a> + Send + Sync>;

type CommandHandlerFn = Arc<
    dyn for<'a> Fn(&'a (dyn Any + Send + Sync), &'a AppContext) -> HandlerFuture<'a>
        + Send
        + Sync,
>;

const PIPELINE_CONTEXT: &str = "Pipeline";

pub struct Pipeline {
    translator: Arc<Translator>,
    queries: DashMap<TypeId, (&'static str, QueryHandlerFn)>,
    commands: DashMap<TypeId, (&'static str, Vec<CommandHandlerFn>)>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Arc::new(Translator::default()))
    }
}

impl Pipeline {
    pub fn new(translator: Arc<Translator>) -> Self {
        Self {
            translator,
            queries: DashMap::new(),
            commands: DashMap::new(),
        }
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// 注册查询处理器
    pub fn register_query<Q, H>(&self, handler: Arc<H>) -> AppResult<()>
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        let f: QueryHandlerFn = Arc::new(move |boxed_q, ctx| {
            let handler = handler.clone();

            Box::pin(async move {
                match boxed_q.downcast::<Q>() {
                    Ok(q) => {
                        let dto = handler.handle(ctx, *q).await?;
                        Ok(Box::new(dto) as BoxAnySend)
                    }
                    Err(e) => Err(AppError::TypeMismatch {
                        expected: type_name::<Q>(),
                        found: type_name_of_val(&e),
                    }),
                }
            })
        });

        match self.queries.entry(TypeId::of::<Q>()) {
            Entry::Occupied(_) => Err(AppError::AlreadyRegisteredQuery { query: Q::NAME }),
            Entry::Vacant(slot) => {
                slot.insert((Q::NAME, f));
                Ok(())
            }
        }
    }

    /// 注册命令处理器；同一命令可注册多个
    pub fn register_command<C, H>(&self, handler: Arc<H>)
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let f: CommandHandlerFn = Arc::new(move |cmd, ctx| {
            let handler = handler.clone();

            Box::pin(async move {
                // 键与闭包共享同一泛型 C，正常情况下不会失败
                let Some(cmd) = cmd.downcast_ref::<C>() else {
                    return Err(AppError::TypeMismatch {
                        expected: type_name::<C>(),
                        found: "unknown",
                    });
                };
                let output = handler.handle(ctx, cmd).await?;
                Ok(Box::new(output) as BoxAnySend)
            })
        });

        self.commands
            .entry(TypeId::of::<C>())
            .or_insert_with(|| (C::NAME, Vec::new()))
            .1
            .push(f);
    }

    /// 已注册的查询名
    pub fn registered_queries(&self) -> Vec<&'static str> {
        self.queries.iter().map(|e| e.value().0).collect()
    }

    /// 已注册的命令名
    pub fn registered_commands(&self) -> Vec<&'static str> {
        self.commands.iter().map(|e| e.value().0).collect()
    }

    /// 调度查询；未注册处理器时返回 `Failure`
    pub async fn dispatch_query<Q: Query>(
        &self,
        ctx: &AppContext,
        query: Q,
    ) -> DispatchResult<Q::Output> {
        let Some(f) = self.queries.get(&TypeId::of::<Q>()).map(|e| e.value().1.clone()) else {
            return self.unregistered(Q::NAME, ctx);
        };

        self.try_execute(Q::NAME, ctx, async move {
            let out = (f)(Box::new(query), ctx).await?;
            downcast_output::<Q::Output>(out)
        })
        .await
    }

    /// 调度命令；每个处理器一个结果，按注册顺序排列
    pub async fn dispatch_command<C: Command>(
        &self,
        ctx: &AppContext,
        command: C,
    ) -> Vec<DispatchResult<C::Output>> {
        let handlers = self
            .commands
            .get(&TypeId::of::<C>())
            .map(|e| e.value().1.clone())
            .unwrap_or_default();
        if handlers.is_empty() {
            return vec![self.unregistered(C::NAME, ctx)];
        }

        let command: &(dyn Any + Send + Sync) = &command;
        join_all(handlers.into_iter().map(|f| {
            self.try_execute(C::NAME, ctx, async move {
                let out = (f)(command, ctx).await?;
                downcast_output::<C::Output>(out)
            })
        }))
        .await
    }

    /// 可取消的查询调度；取消时返回 `Exception(Cancelled)`
    pub async fn dispatch_query_with_cancel<Q: Query>(
        &self,
        ctx: &AppContext,
        query: Q,
        token: &CancellationToken,
    ) -> DispatchResult<Q::Output> {
        tokio::select! {
            biased;
            _ = token.cancelled() => cancelled(Q::NAME, ctx),
            result = self.dispatch_query(ctx, query) => result,
        }
    }

    /// 可取消的命令调度；取消时返回单个 `Exception(Cancelled)`
    pub async fn dispatch_command_with_cancel<C: Command>(
        &self,
        ctx: &AppContext,
        command: C,
        token: &CancellationToken,
    ) -> Vec<DispatchResult<C::Output>> {
        tokio::select! {
            biased;
            _ = token.cancelled() => vec![cancelled(C::NAME, ctx)],
            results = self.dispatch_command(ctx, command) => results,
        }
    }

    async fn try_execute<T, F>(
        &self,
        name: &'static str,
        ctx: &AppContext,
        fut: F,
    ) -> DispatchResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        let err = match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok(value)) => return DispatchResult::Success(value),
            Ok(Err(err)) => err,
            Err(payload) => AppError::Panicked(panic_message(payload)),
        };
        self.convert_error(name, ctx, err)
    }

    fn convert_error<T>(
        &self,
        name: &'static str,
        ctx: &AppContext,
        err: AppError,
    ) -> DispatchResult<T> {
        let correlation_id = ctx.correlation_id();

        if let Some(contexts) = err.notification_contexts() {
            log_notifications(contexts, name, &correlation_id);
            return self.failure(contexts, &correlation_id);
        }

        if err.is_persistence() {
            tracing::error!(
                correlation_id = %correlation_id,
                handler = name,
                error = %err,
                "persistence failure"
            );
            let mut context =
                NotificationContext::new(self.translator.config().persistence_context.clone());
            context.add_notification(NotificationMessage::new(
                NotificationKind::PERSISTENCE_REJECTED,
            ));
            return self.failure(&[context], &correlation_id);
        }

        tracing::error!(
            correlation_id = %correlation_id,
            handler = name,
            error = %err,
            "unexpected error"
        );
        DispatchResult::Exception(err)
    }

    fn unregistered<T>(&self, name: &'static str, ctx: &AppContext) -> DispatchResult<T> {
        let correlation_id = ctx.correlation_id();
        let mut context = NotificationContext::new(PIPELINE_CONTEXT);
        context.add_notification(
            NotificationMessage::builder()
                .notification(NotificationKind::HANDLER_NOT_REGISTERED)
                .field_name("handler")
                .fun_name(name)
                .build(),
        );
        log_notifications(std::slice::from_ref(&context), name, &correlation_id);
        self.failure(&[context], &correlation_id)
    }

    fn failure<T>(
        &self,
        contexts: &[NotificationContext],
        correlation_id: &str,
    ) -> DispatchResult<T> {
        match self.translator.to_notification_context_dtos(contexts) {
            Ok(dtos) => DispatchResult::Failure(dtos),
            Err(err) => {
                tracing::error!(correlation_id, error = %err, "notification translation failed");
                DispatchResult::Exception(err)
            }
        }
    }
}

fn downcast_output<T: 'static>(out: BoxAnySend) -> AppResult<T> {
    match out.downcast::<T>() {
        Ok(value) => Ok(*value),
        Err(e) => Err(AppError::TypeMismatch {
            expected: type_name::<T>(),
            found: type_name_of_val(&e),
        }),
    }
}

fn cancelled<T>(name: &'static str, ctx: &AppContext) -> DispatchResult<T> {
    tracing::warn!(correlation_id = %ctx.correlation_id(), handler = name, "dispatch cancelled");
    DispatchResult::Exception(AppError::Cancelled)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        return (*s).to_string();
    }
    match payload.downcast::<String>() {
        Ok(s) => *s,
        Err(_) => "unknown panic payload".to_string(),
    }
}

// 存在携带异常的通知时为 ERROR，否则为 INFO
fn log_notifications(contexts: &[NotificationContext], handler: &str, correlation_id: &str) {
    let text = contexts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    if contexts.iter().any(NotificationContext::has_exception) {
        tracing::error!(correlation_id, handler, contexts = %text, "request rejected");
    } else {
        tracing::info!(correlation_id, handler, contexts = %text, "request rejected");
    }
}
