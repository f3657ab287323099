use super::{Language, TranslateModule};
use crate::config::KernelConfig;
use crate::dto::{NotificationContextDto, NotificationDto};
use crate::error::{AppError, AppResult};
use kernel_domain::notification::NotificationContext;
use kernel_domain::value_object::EnumValueObject;

/// 翻译器：按当前语言在已导入的模块中查找键
///
/// 模块按导入顺序查找，先导入者优先。
#[derive(Debug, Clone)]
pub struct Translator {
    config: KernelConfig,
    modules: Vec<TranslateModule>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::with_kernel_modules(KernelConfig::default(), Vec::new())
    }
}

impl Translator {
    pub fn new(config: KernelConfig, modules: Vec<TranslateModule>) -> Self {
        Self { config, modules }
    }

    /// 应用模块在前（可覆盖内核用语），其后追加内核自带的 PT_BR 与 ENG 模块
    pub fn with_kernel_modules(config: KernelConfig, modules: Vec<TranslateModule>) -> Self {
        let mut translator = Self::new(config, modules);
        translator.import_module(TranslateModule::kernel_pt_br());
        translator.import_module(TranslateModule::kernel_eng());
        translator
    }

    pub fn import_module(&mut self, module: TranslateModule) {
        self.modules.push(module);
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn language(&self) -> Language {
        self.config.language
    }

    pub fn get_translation_by_key(&self, key: &str) -> AppResult<&str> {
        let language = self.language();
        self.modules
            .iter()
            .filter(|m| m.language == language)
            .find_map(|m| m.get(key))
            .ok_or_else(|| AppError::TranslationNotFound {
                key: key.to_string(),
                language: language.to_string(),
            })
    }

    /// 找不到翻译时按配置回退到键本身
    pub fn translate_or_key(&self, key: &str) -> AppResult<String> {
        match self.get_translation_by_key(key) {
            Ok(text) => Ok(text.to_string()),
            Err(_) if self.config.fallback_to_key => {
                tracing::warn!(key, language = %self.language(), "translation not found");
                Ok(key.to_string())
            }
            Err(err) => Err(err),
        }
    }

    /// 枚举值对象的展示文本
    pub fn describe<E: EnumValueObject>(&self, value: E) -> AppResult<String> {
        self.translate_or_key(&value.description_key())
    }

    /// 通知上下文 → 对外 DTO；字段名没有翻译时保持原样
    pub fn to_notification_context_dtos(
        &self,
        contexts: &[NotificationContext],
    ) -> AppResult<Vec<NotificationContextDto>> {
        contexts
            .iter()
            .map(|context| -> AppResult<NotificationContextDto> {
                let notifications = context
                    .notifications()
                    .iter()
                    .map(|n| -> AppResult<NotificationDto> {
                        Ok(NotificationDto {
                            field_name: n.field_name().map(|name| self.field_name(name)),
                            field_value: n.field_value().map(str::to_string),
                            fun_name: n.fun_name().map(str::to_string),
                            message: self.translate_or_key(n.notification().key())?,
                        })
                    })
                    .collect::<AppResult<Vec<_>>>()?;
                Ok(NotificationContextDto {
                    context: self.translate_or_key(context.context_name())?,
                    notifications,
                })
            })
            .collect()
    }

    fn field_name(&self, name: &str) -> String {
        self.get_translation_by_key(name)
            .map(str::to_string)
            .unwrap_or_else(|_| name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel_domain::entity::EntityMode;
    use kernel_domain::notification::{NotificationKind, NotificationMessage};

    fn contexts() -> Vec<NotificationContext> {
        let mut ctx = NotificationContext::new("Pipeline");
        ctx.add_notification(NotificationMessage::for_field(
            NotificationKind::INVALID_ID_UUID,
            "Id",
            Some("abc".into()),
        ));
        ctx.add_notification(NotificationMessage::for_field(
            NotificationKind::new("CustomNotification"),
            "email",
            None,
        ));
        vec![ctx]
    }

    #[test]
    fn pt_br_is_the_default_language() {
        let translator = Translator::default();
        assert_eq!(
            translator
                .get_translation_by_key("InsertNotAllowedNotification")
                .unwrap(),
            "Inclusão não permitida."
        );
        assert_eq!(translator.describe(EntityMode::Insert).unwrap(), "Inserir");
    }

    #[test]
    fn dtos_translate_context_fields_and_messages() {
        let translator = Translator::default();
        let dtos = translator.to_notification_context_dtos(&contexts()).unwrap();

        assert_eq!(dtos[0].context, "Fluxo de dados");
        let first = &dtos[0].notifications[0];
        assert_eq!(first.field_name.as_deref(), Some("Chave primária"));
        assert_eq!(first.field_value.as_deref(), Some("abc"));
        assert_eq!(first.message, "Chave primária do registro é inválida.");

        let second = &dtos[0].notifications[1];
        assert_eq!(second.field_name.as_deref(), Some("email"));
        assert_eq!(second.message, "CustomNotification");
    }

    #[test]
    fn application_modules_override_kernel_wording() {
        let config = KernelConfig::builder().language(Language::Eng).build();
        let custom = TranslateModule::new(
            Language::Eng,
            [("InsertNotAllowedNotification", "You cannot create this.")],
        );
        let translator = Translator::with_kernel_modules(config, vec![custom]);

        assert_eq!(
            translator
                .get_translation_by_key("InsertNotAllowedNotification")
                .unwrap(),
            "You cannot create this."
        );
        assert_eq!(
            translator.translate_or_key("Pipeline").unwrap(),
            "Pipeline"
        );
    }

    #[test]
    fn strict_mode_reports_missing_keys() {
        let config = KernelConfig::builder()
            .language(Language::Fr)
            .fallback_to_key(false)
            .build();
        let translator = Translator::with_kernel_modules(config, Vec::new());

        match translator.translate_or_key("Pipeline") {
            Err(AppError::TranslationNotFound { key, language }) => {
                assert_eq!(key, "Pipeline");
                assert_eq!(language, "FR");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(translator.to_notification_context_dtos(&contexts()).is_err());
    }
}
