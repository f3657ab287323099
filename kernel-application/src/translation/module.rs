use super::Language;
use std::collections::HashMap;

/// 某一语言的翻译表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateModule {
    pub language: Language,
    pub translations: HashMap<String, String>,
}

impl TranslateModule {
    pub fn new<K, V>(language: Language, translations: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            language,
            translations: translations
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.translations.get(key).map(String::as_str)
    }

    /// 内核自带的葡萄牙语（巴西）翻译
    pub fn kernel_pt_br() -> Self {
        Self::new(
            Language::PtBr,
            [
                // 领域
                (
                    "UnableToUpdateWithoutIDNotification",
                    "Impossível efetuar a atualização do registro sem a chave primária.",
                ),
                (
                    "UnableToDeleteWithoutIDNotification",
                    "Impossível efetuar a exclusão do registro sem a chave primária.",
                ),
                (
                    "UnableToInsertWithIDNotification",
                    "Impossível efetuar a inclusão de um registro com a chave primária informada.",
                ),
                ("EntityAlreadyAddedNotification", "Entidade já foi adicionada."),
                ("EntityDoesNotExistNotification", "Entidade não existe."),
                ("EntityIsNotActiveNotification", "Entidade não está ativa."),
                ("InvalidEntityModeNotification", "Modo da transação é inválido."),
                ("InvalidIDUUIDNotification", "Chave primária do registro é inválida."),
                ("InvalidAggregateItemStatusNotification", "Situação do agregado é inválida."),
                ("InvalidEventTypeNotification", "Tipo de evento é inválido."),
                ("InsertNotAllowedNotification", "Inclusão não permitida."),
                ("UpdateNotAllowedNotification", "Atualização não permitida."),
                ("DeleteNotAllowedNotification", "Exclusão não permitida."),
                ("ServiceIsRequiredNotification", "Serviço de domínio é obrigatório."),
                (
                    "RepositoryFunctionNotImplementedNotification",
                    "Função do repositório não implementada.",
                ),
                // 值对象
                ("EntityMode.UNKNOWN", "Desconhecido"),
                ("EntityMode.DISPLAY", "Consulta"),
                ("EntityMode.INSERT", "Inserir"),
                ("EntityMode.UPDATE", "Atualizar"),
                ("EntityMode.DELETE", "Excluir"),
                ("AggregateItemStatus.UNKNOWN", "Desconhecido"),
                ("AggregateItemStatus.CONSTRUCTOR", "Construtor"),
                ("AggregateItemStatus.ADDED", "Adicionado"),
                ("AggregateItemStatus.CHANGED", "Alterado"),
                ("AggregateItemStatus.REMOVED", "Removido"),
                ("Id", "Chave primária"),
                // 事件
                ("EventType.UNKNOWN", "Desconhecido"),
                ("EventType.LOG", "Log"),
                ("EventType.AUDIT", "Auditoria"),
                ("EventType.DEBUG", "Debug"),
                ("EventType.ERROR", "Erro"),
                ("EventType.WARNING", "Aviso"),
                // 应用
                ("InvalidLanguageNotification", "Idioma não é válido."),
                (
                    "PersistenceRejectedNotification",
                    "Registro não pode ser incluído, alterado ou excluído.",
                ),
                (
                    "HandlerNotRegisteredNotification",
                    "Nenhum manipulador registrado para a operação.",
                ),
                ("Pipeline", "Fluxo de dados"),
                ("Language.UNKNOWN", "Desconhecido"),
                ("Language.PT_BR", "Português"),
                ("Language.ENG", "Inglês"),
                ("Language.ES", "Espanhol"),
                ("Language.FR", "Francês"),
            ],
        )
    }

    /// 内核自带的英语翻译
    pub fn kernel_eng() -> Self {
        Self::new(
            Language::Eng,
            [
                (
                    "UnableToUpdateWithoutIDNotification",
                    "Unable to update a record without its primary key.",
                ),
                (
                    "UnableToDeleteWithoutIDNotification",
                    "Unable to delete a record without its primary key.",
                ),
                (
                    "UnableToInsertWithIDNotification",
                    "Unable to insert a record with a primary key already set.",
                ),
                ("EntityAlreadyAddedNotification", "Entity has already been added."),
                ("EntityDoesNotExistNotification", "Entity does not exist."),
                ("EntityIsNotActiveNotification", "Entity is not active."),
                ("InvalidEntityModeNotification", "Entity mode is invalid."),
                ("InvalidIDUUIDNotification", "Record primary key is invalid."),
                ("InvalidAggregateItemStatusNotification", "Aggregate item status is invalid."),
                ("InvalidEventTypeNotification", "Event type is invalid."),
                ("InsertNotAllowedNotification", "Insert not allowed."),
                ("UpdateNotAllowedNotification", "Update not allowed."),
                ("DeleteNotAllowedNotification", "Delete not allowed."),
                ("ServiceIsRequiredNotification", "A domain service is required."),
                (
                    "RepositoryFunctionNotImplementedNotification",
                    "Repository function is not implemented.",
                ),
                ("EntityMode.UNKNOWN", "Unknown"),
                ("EntityMode.DISPLAY", "Display"),
                ("EntityMode.INSERT", "Insert"),
                ("EntityMode.UPDATE", "Update"),
                ("EntityMode.DELETE", "Delete"),
                ("AggregateItemStatus.UNKNOWN", "Unknown"),
                ("AggregateItemStatus.CONSTRUCTOR", "Constructor"),
                ("AggregateItemStatus.ADDED", "Added"),
                ("AggregateItemStatus.CHANGED", "Changed"),
                ("AggregateItemStatus.REMOVED", "Removed"),
                ("Id", "Primary key"),
                ("EventType.UNKNOWN", "Unknown"),
                ("EventType.LOG", "Log"),
                ("EventType.AUDIT", "Audit"),
                ("EventType.DEBUG", "Debug"),
                ("EventType.ERROR", "Error"),
                ("EventType.WARNING", "Warning"),
                ("InvalidLanguageNotification", "Language is not valid."),
                (
                    "PersistenceRejectedNotification",
                    "Record could not be inserted, updated or deleted.",
                ),
                ("HandlerNotRegisteredNotification", "No handler registered for the operation."),
                ("Pipeline", "Pipeline"),
                ("Language.UNKNOWN", "Unknown"),
                ("Language.PT_BR", "Portuguese"),
                ("Language.ENG", "English"),
                ("Language.ES", "Spanish"),
                ("Language.FR", "French"),
            ],
        )
    }
}
