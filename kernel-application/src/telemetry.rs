use crate::error::{AppError, AppResult};
use tracing_subscriber::EnvFilter;

/// 安装全局 fmt 订阅者（写入 stderr）
///
/// `RUST_LOG` 优先，未设置时使用 `default_directive`（例如 `"info"`）。
/// 已安装过全局订阅者时返回错误；内核库本身从不调用。
pub fn init_tracing(default_directive: &str) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| AppError::Unexpected(anyhow::anyhow!("invalid log directive: {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| {
            AppError::Unexpected(anyhow::anyhow!("failed to install tracing subscriber: {e}"))
        })
}
