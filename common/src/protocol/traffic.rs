//! 流量采集相关类型
//!
//! 定义了从引擎拉取的流量增量结构体。

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 单条入站/出站流量记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficRecord {
    pub tag: String,
    pub is_inbound: bool,
    pub up: i64,
    pub down: i64,
}

/// 单条客户端流量记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientTrafficRecord {
    pub email: String,
    pub up: i64,
    pub down: i64,
}

/// 一次采集周期内的全部流量增量
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrafficReport {
    pub inbounds: Vec<TrafficRecord>,
    pub clients: Vec<ClientTrafficRecord>,
}

/// 流量来源接口
///
/// 由引擎客户端实现，reset 为 true 时引擎侧计数器随查询清零。
#[async_trait]
pub trait TrafficSource: Send + Sync {
    async fn poll_traffic(&self, reset: bool) -> Result<TrafficReport>;
}
