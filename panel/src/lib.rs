//! 代理面板核心：入站与客户端管理、流量台账和引擎对账
//!
//! 服务层是唯一的写入口，外层（守护进程或上层接口）只组合这些服务。

pub mod config;
pub mod engine_client;
pub mod entity;
pub mod error;
pub mod inbound_service;
pub mod maintenance;
pub mod migration;
pub mod presence;
pub mod settings;
pub mod sync;
pub mod traffic_service;

#[cfg(test)]
mod test_util;
