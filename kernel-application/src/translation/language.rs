use kernel_domain::enum_value_object;
use kernel_domain::notification::NotificationKind;

/// 翻译使用的语言
#[enum_value_object(unknown = NotificationKind::INVALID_LANGUAGE)]
pub enum Language {
    Unknown = 0,
    PtBr = 1,
    Eng = 2,
    Es = 3,
    Fr = 4,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel_domain::notification::NotificationContext;
    use kernel_domain::value_object::{EnumValueObject, ValueObject};

    #[test]
    fn names_and_lookup() {
        assert_eq!(Language::PtBr.name(), "PT_BR");
        assert_eq!(Language::from_name("pt_br"), Language::PtBr);
        assert_eq!(Language::from_value(9), Language::Unknown);
        assert_eq!(Language::Fr.description_key(), "Language.FR");

        let mut ctx = NotificationContext::new("Config");
        assert!(!Language::Unknown.is_valid(Some("language"), Some(&mut ctx)));
        assert!(ctx.contains(&NotificationKind::INVALID_LANGUAGE));
    }
}
