use serde::{Deserialize, Serialize};

/// 数据传输对象（DTO）
///
/// - 作为应用层的输出载体，面向接口/外部系统序列化友好；
/// - 与领域模型解耦，避免将领域对象直接暴露到接口层。
pub trait Dto: Serialize + Send + Sync + 'static {}

impl Dto for () {}
impl Dto for bool {}
impl Dto for String {}
impl Dto for i64 {}
impl Dto for u64 {}
impl<T: Dto> Dto for Option<T> {}
impl<T: Dto> Dto for Vec<T> {}

/// 已翻译的单条通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fun_name: Option<String>,
    pub message: String,
}

/// 一个失败的校验上下文：`{context, notifications: [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationContextDto {
    pub context: String,
    pub notifications: Vec<NotificationDto>,
}

impl Dto for NotificationContextDto {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_omits_missing_fields() {
        let dto = NotificationContextDto {
            context: "Cliente".into(),
            notifications: vec![NotificationDto {
                field_name: Some("E-mail".into()),
                field_value: None,
                fun_name: None,
                message: "E-mail inválido".into(),
            }],
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "context": "Cliente",
                "notifications": [{ "fieldName": "E-mail", "message": "E-mail inválido" }]
            })
        );
    }
}
