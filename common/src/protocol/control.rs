//! 引擎控制 trait 和相关类型
//!
//! 定义了面板控制代理引擎入站监听器的接口。

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 推送给引擎的用户属性
///
/// shadowsocks 的 cipher 来自入站设置中的 method 字段，
/// 其余协议该字段为空字符串。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineUser {
    pub email: String,
    pub id: String,
    pub flow: String,
    pub password: String,
    pub cipher: String,
}

/// 引擎控制接口
///
/// 由面板通过 HTTP 远程调用引擎实现，测试中由记录桩实现。
/// 每次调用独立建立并释放控制通道。
#[async_trait]
pub trait EngineControl: Send + Sync {
    /// 向运行中的引擎添加一个完整的入站配置
    async fn add_inbound(&self, config: &serde_json::Value) -> Result<()>;

    /// 按 tag 移除入站
    async fn remove_inbound(&self, tag: &str) -> Result<()>;

    /// 向指定入站添加用户
    async fn add_user(&self, protocol: &str, tag: &str, user: &EngineUser) -> Result<()>;

    /// 从指定入站移除用户
    ///
    /// 用户不存在时引擎返回 "User {email} not found."，由调用方判定。
    async fn remove_user(&self, tag: &str, email: &str) -> Result<()>;
}
