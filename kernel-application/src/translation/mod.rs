//! 翻译（translation）
//!
//! 只影响通知的展示，不参与校验逻辑：
//! - `Language`：当前语言；
//! - `TranslateModule`：某一语言的键值表，内核自带 PT_BR 与 ENG；
//! - `Translator`：按配置查找并把通知上下文转换为对外 DTO。
//!
mod language;
mod module;
mod translator;

pub use language::Language;
pub use module::TranslateModule;
pub use translator::Translator;
