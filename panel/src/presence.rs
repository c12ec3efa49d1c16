//! 在线客户端集合
//!
//! 每个记账周期整体替换，不做增量合并。

use tokio::sync::RwLock;

/// 在线客户端注册表，按显式句柄传递
#[derive(Debug, Default)]
pub struct OnlineRegistry {
    emails: RwLock<Vec<String>>,
}

impl OnlineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用本周期产生过流量的邮箱整体替换在线集合
    pub async fn replace(&self, emails: Vec<String>) {
        *self.emails.write().await = emails;
    }

    pub async fn snapshot(&self) -> Vec<String> {
        self.emails.read().await.clone()
    }
}
