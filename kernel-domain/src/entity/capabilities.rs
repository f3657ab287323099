use bon::Builder;
use serde::{Deserialize, Serialize};

/// 实体能力描述：允许的写操作以及是否必须提供领域服务
///
/// 默认全部关闭，与未声明能力的实体保持一致。
#[derive(Builder, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    #[builder(default)]
    insertable: bool,
    #[builder(default)]
    updatable: bool,
    #[builder(default)]
    deletable: bool,
    #[builder(default)]
    service_required: bool,
}

impl Capabilities {
    /// 允许新增、修改与删除，不要求领域服务
    pub fn writable() -> Self {
        Self {
            insertable: true,
            updatable: true,
            deletable: true,
            service_required: false,
        }
    }

    pub fn insertable(&self) -> bool {
        self.insertable
    }

    pub fn updatable(&self) -> bool {
        self.updatable
    }

    pub fn deletable(&self) -> bool {
        self.deletable
    }

    pub fn service_required(&self) -> bool {
        self.service_required
    }
}
