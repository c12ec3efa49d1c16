//! 入站设置编解码
//!
//! settings 字段是一个内嵌客户端列表的 JSON 对象。客户端对象和外层
//! 设置对象上未识别的键（limitIp、subId、tgId、decryption、method 等）
//! 必须在 解码-修改-编码 往返后原样保留。

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity::inbound::{KeyClass, Protocol};
use crate::error::{Result, ServiceError};

/// 嵌在入站 settings 中的单个客户端
///
/// 缺失字段按零值补齐，与历史数据保持兼容。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub flow: String,
    #[serde(default)]
    pub enable: bool,
    /// 流量配额（字节），0 表示不限量
    #[serde(default, rename = "totalGB")]
    pub total_gb: i64,
    /// 过期时间原始值，见 [`ExpiryState`]
    #[serde(default, rename = "expiryTime")]
    pub expiry_time: i64,
    /// 自动续期周期（天），0 表示关闭
    #[serde(default)]
    pub reset: i32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 入站 settings 的结构化视图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundSettings {
    pub clients: Vec<ClientConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InboundSettings {
    /// 解析设置字段，不是对象或缺失 clients 键时报错
    pub fn decode(blob: &str) -> Result<Self> {
        serde_json::from_str(blob).map_err(|e| ServiceError::Settings(e.to_string()))
    }

    pub fn encode(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ServiceError::Settings(e.to_string()))
    }

    /// shadowsocks 入站的加密方法，记录在设置对象的 method 键上
    pub fn cipher(&self) -> &str {
        self.extra
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

/// 客户端在某协议下的标识视图
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKey<'a> {
    Id(&'a str),
    Password(&'a str),
    Email(&'a str),
}

impl<'a> ClientKey<'a> {
    pub fn value(&self) -> &'a str {
        match self {
            ClientKey::Id(v) | ClientKey::Password(v) | ClientKey::Email(v) => v,
        }
    }
}

/// 取客户端在该协议下的标识，为空时报 EmptyIdentifier
pub fn client_key(protocol: Protocol, client: &ClientConfig) -> Result<ClientKey<'_>> {
    let key = match protocol.key_class() {
        KeyClass::Id => ClientKey::Id(client.id.as_str()),
        KeyClass::Password => ClientKey::Password(client.password.as_str()),
        KeyClass::Email => ClientKey::Email(client.email.as_str()),
    };
    if key.value().is_empty() {
        return Err(ServiceError::EmptyIdentifier);
    }
    Ok(key)
}

/// 校验客户端集合：标识非空且在入站内唯一
pub fn validate_clients(protocol: Protocol, clients: &[ClientConfig]) -> Result<()> {
    let mut seen = HashSet::new();
    for client in clients {
        let key = client_key(protocol, client)?;
        if !seen.insert(key.value().to_string()) {
            return Err(ServiceError::DuplicateClientId(key.value().to_string()));
        }
    }
    Ok(())
}

/// expiryTime 原始值的显式视图
///
/// 0 永不过期；正值为绝对毫秒时间戳；负值表示首次产生流量后
/// 再存活该毫秒跨度，首次记账时一次性转为绝对时间。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryState {
    Never,
    FixedAt(i64),
    AfterFirstUse(i64),
}

impl ExpiryState {
    pub fn from_millis(raw: i64) -> Self {
        if raw == 0 {
            ExpiryState::Never
        } else if raw > 0 {
            ExpiryState::FixedAt(raw)
        } else {
            ExpiryState::AfterFirstUse(-raw)
        }
    }

    /// 待定状态在 now 时刻落定的绝对过期时间
    pub fn resolve_at(self, now_ms: i64) -> Option<i64> {
        match self {
            ExpiryState::AfterFirstUse(span) => Some(now_ms + span),
            ExpiryState::Never | ExpiryState::FixedAt(_) => None,
        }
    }
}
