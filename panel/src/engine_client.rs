//! 远程引擎控制客户端
//!
//! 通过 HTTP 调用引擎的内部接口，实现 EngineControl 和 TrafficSource。
//! 每次调用构造独立的连接并在返回时释放，控制通道不跨调用持有。

use anyhow::Result;
use async_trait::async_trait;
use common::protocol::control::{EngineControl, EngineUser};
use common::protocol::traffic::{TrafficReport, TrafficSource};
use tracing::debug;

/// 远程引擎控制客户端
pub struct RemoteEngineControl {
    base_url: String,
    secret: String,
}

impl RemoteEngineControl {
    pub fn new(base_url: String, secret: String) -> Self {
        Self { base_url, secret }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<()> {
        let url = self.url(path);
        // 独立的短生命周期连接，任何返回路径上都会被释放
        let client = reqwest::Client::new();
        let resp = client
            .post(&url)
            .header("X-Internal-Secret", &self.secret)
            .json(body)
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Err(anyhow::anyhow!("引擎调用 {} 失败: {} - {}", path, status, body))
        }
    }
}

#[async_trait]
impl EngineControl for RemoteEngineControl {
    async fn add_inbound(&self, config: &serde_json::Value) -> Result<()> {
        debug!("调用引擎添加入站: tag={}", config["tag"]);
        self.post("/internal/inbound/add", config).await
    }

    async fn remove_inbound(&self, tag: &str) -> Result<()> {
        debug!("调用引擎移除入站: tag={}", tag);
        self.post(
            "/internal/inbound/remove",
            &serde_json::json!({ "tag": tag }),
        )
        .await
    }

    async fn add_user(&self, protocol: &str, tag: &str, user: &EngineUser) -> Result<()> {
        debug!("调用引擎添加用户: tag={}, email={}", tag, user.email);
        self.post(
            "/internal/user/add",
            &serde_json::json!({
                "protocol": protocol,
                "tag": tag,
                "user": user,
            }),
        )
        .await
    }

    async fn remove_user(&self, tag: &str, email: &str) -> Result<()> {
        debug!("调用引擎移除用户: tag={}, email={}", tag, email);
        self.post(
            "/internal/user/remove",
            &serde_json::json!({
                "tag": tag,
                "email": email,
            }),
        )
        .await
    }
}

#[async_trait]
impl TrafficSource for RemoteEngineControl {
    async fn poll_traffic(&self, reset: bool) -> Result<TrafficReport> {
        let url = self.url("/internal/traffic/poll");
        debug!("调用引擎拉取流量: reset={}", reset);

        let client = reqwest::Client::new();
        let resp = client
            .post(&url)
            .header("X-Internal-Secret", &self.secret)
            .json(&serde_json::json!({ "reset": reset }))
            .send()
            .await?;

        if resp.status().is_success() {
            let report: TrafficReport = resp.json().await?;
            Ok(report)
        } else {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Err(anyhow::anyhow!("引擎拉取流量失败: {} - {}", status, body))
        }
    }
}
