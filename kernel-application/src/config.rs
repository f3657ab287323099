//! 内核配置
//!
//! 以显式对象注入（`Translator::new(config, modules)`），不存在进程级可变状态；
//! 可由上层从任意来源反序列化，内核自身不读取文件。
//!
use crate::translation::Language;
use bon::Builder;
use serde::{Deserialize, Serialize};

#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KernelConfig {
    /// 当前语言
    #[builder(default = Language::PtBr)]
    pub language: Language,
    /// 缺少翻译时以键本身代替（并记录 WARN），否则报 `TranslationNotFound`
    #[builder(default = true)]
    pub fallback_to_key: bool,
    /// 持久化失败时合成的通知上下文名
    #[builder(into, default = String::from("Pipeline"))]
    pub persistence_context: String,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_partial_deserialization() {
        let config = KernelConfig::default();
        assert_eq!(config.language, Language::PtBr);
        assert!(config.fallback_to_key);
        assert_eq!(config.persistence_context, "Pipeline");

        let config: KernelConfig =
            serde_json::from_str(r#"{"language":"ENG","fallbackToKey":false}"#).unwrap();
        assert_eq!(config.language, Language::Eng);
        assert!(!config.fallback_to_key);
        assert_eq!(config.persistence_context, "Pipeline");

        let custom = KernelConfig::builder()
            .language(Language::Es)
            .persistence_context("Fluxo")
            .build();
        assert_eq!(custom.persistence_context, "Fluxo");
    }
}
