//! 引擎同步层
//!
//! 将已落库的变更翻译成最小的引擎调用。引擎侧任何失败都降级为
//! AppliedWithDrift（需要重启引擎才能对齐），不影响已提交的存储结果。

use std::sync::Arc;

use common::protocol::control::{EngineControl, EngineUser};
use serde_json::Value;
use tracing::debug;

use crate::entity::inbound::{self, Protocol};
use crate::error::{Result, ServiceError};
use crate::settings::{ClientConfig, InboundSettings};

/// 一次同步动作的结果，偏移占优
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// 引擎状态与存储一致
    Applied,
    /// 存储已提交但引擎未跟上，需要重启引擎对齐
    AppliedWithDrift,
}

impl SyncOutcome {
    pub fn needs_restart(self) -> bool {
        matches!(self, SyncOutcome::AppliedWithDrift)
    }

    pub fn merge(self, other: SyncOutcome) -> SyncOutcome {
        if self.needs_restart() || other.needs_restart() {
            SyncOutcome::AppliedWithDrift
        } else {
            SyncOutcome::Applied
        }
    }
}

/// 组装推送给引擎的完整入站配置
///
/// settings 必须是合法 JSON；streamSettings 和 sniffing 允许为空。
pub fn engine_inbound_config(inbound: &inbound::Model) -> Result<Value> {
    let settings: Value = serde_json::from_str(&inbound.settings)
        .map_err(|e| ServiceError::Settings(e.to_string()))?;
    let stream_settings = parse_optional(&inbound.stream_settings)?;
    let sniffing = parse_optional(&inbound.sniffing)?;

    Ok(serde_json::json!({
        "tag": inbound.tag,
        "listen": inbound.listen,
        "port": inbound.port,
        "protocol": inbound.protocol.as_str(),
        "settings": settings,
        "streamSettings": stream_settings,
        "sniffing": sniffing,
    }))
}

fn parse_optional(blob: &str) -> Result<Value> {
    if blob.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(blob).map_err(|e| ServiceError::Settings(e.to_string()))
}

/// 组装推送给引擎的用户属性
pub fn engine_user(client: &ClientConfig, cipher: &str) -> EngineUser {
    EngineUser {
        email: client.email.clone(),
        id: client.id.clone(),
        flow: client.flow.clone(),
        password: client.password.clone(),
        cipher: cipher.to_string(),
    }
}

/// 该协议推送用户时附带的 cipher，只有 shadowsocks 需要
pub fn cipher_for(protocol: Protocol, settings: &InboundSettings) -> String {
    match protocol {
        Protocol::Shadowsocks => settings.cipher().to_string(),
        _ => String::new(),
    }
}

/// 面向服务层的引擎同步句柄
#[derive(Clone)]
pub struct LiveSync {
    engine: Arc<dyn EngineControl>,
}

impl LiveSync {
    pub fn new(engine: Arc<dyn EngineControl>) -> Self {
        Self { engine }
    }

    /// 推送完整入站配置
    pub async fn push_inbound(&self, inbound: &inbound::Model) -> SyncOutcome {
        let config = match engine_inbound_config(inbound) {
            Ok(config) => config,
            Err(e) => {
                debug!("入站 {} 配置组装失败: {}", inbound.tag, e);
                return SyncOutcome::AppliedWithDrift;
            }
        };
        match self.engine.add_inbound(&config).await {
            Ok(()) => SyncOutcome::Applied,
            Err(e) => {
                debug!("推送入站 {} 失败: {}", inbound.tag, e);
                SyncOutcome::AppliedWithDrift
            }
        }
    }

    /// 按 tag 移除入站
    pub async fn drop_inbound(&self, tag: &str) -> SyncOutcome {
        match self.engine.remove_inbound(tag).await {
            Ok(()) => SyncOutcome::Applied,
            Err(e) => {
                debug!("移除入站 {} 失败: {}", tag, e);
                SyncOutcome::AppliedWithDrift
            }
        }
    }

    /// 向指定入站推送用户
    pub async fn push_user(
        &self,
        protocol: Protocol,
        tag: &str,
        client: &ClientConfig,
        cipher: &str,
    ) -> SyncOutcome {
        let user = engine_user(client, cipher);
        match self.engine.add_user(protocol.as_str(), tag, &user).await {
            Ok(()) => SyncOutcome::Applied,
            Err(e) => {
                debug!("推送用户 {} 到 {} 失败: {}", client.email, tag, e);
                SyncOutcome::AppliedWithDrift
            }
        }
    }

    /// 从指定入站移除用户
    ///
    /// 引擎报 "User x not found." 视为已对齐。
    pub async fn drop_user(&self, tag: &str, email: &str) -> SyncOutcome {
        match self.engine.remove_user(tag, email).await {
            Ok(()) => SyncOutcome::Applied,
            Err(e) => {
                if e.to_string().contains(&format!("User {} not found.", email)) {
                    debug!("用户 {} 已不在引擎中", email);
                    return SyncOutcome::Applied;
                }
                debug!("移除用户 {} 失败: {}", email, e);
                SyncOutcome::AppliedWithDrift
            }
        }
    }
}
