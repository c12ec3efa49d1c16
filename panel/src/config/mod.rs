//! 面板配置模块

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tokio::sync::OnceCell;

/// 面板配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// 代理引擎内部 API 地址
    #[serde(default = "default_engine_api_url")]
    pub engine_api_url: String,

    /// 面板→引擎通信的内部密钥
    #[serde(default)]
    pub engine_api_secret: Option<String>,

    /// 数据库路径
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// 流量采集周期（秒）
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_engine_api_url() -> String {
    "http://127.0.0.1:62789".to_string()
}

fn default_db_path() -> String {
    "./data/panel.db".to_string()
}

fn default_poll_interval() -> u64 {
    10
}

impl Config {
    /// 获取引擎内部密钥（优先环境变量 ENGINE_API_SECRET，其次配置文件）
    pub fn get_engine_secret(&self) -> String {
        if let Ok(secret) = std::env::var("ENGINE_API_SECRET") {
            if !secret.is_empty() {
                return secret;
            }
        }
        self.engine_api_secret.clone().unwrap_or_default()
    }
}

static CONFIG: OnceCell<Config> = OnceCell::const_new();

/// 获取全局配置
pub async fn get_config() -> &'static Config {
    CONFIG.get_or_init(init_config).await
}

/// 初始化配置
pub async fn init_config() -> Config {
    for path_str in ["panel.toml", "../panel.toml"] {
        if let Some(config) = read_config_file(Path::new(path_str)) {
            tracing::info!("📋 已加载配置: {}", path_str);
            return config;
        }
    }

    tracing::warn!("未找到配置文件，使用默认配置");
    Config {
        engine_api_url: default_engine_api_url(),
        engine_api_secret: None,
        db_path: default_db_path(),
        poll_interval_secs: default_poll_interval(),
    }
}

fn read_config_file(path: &Path) -> Option<Config> {
    if !path.exists() {
        return None;
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("无法读取配置文件: {}", path.display()))
        .unwrap();
    let config = toml::from_str(&content)
        .with_context(|| format!("配置文件格式错误: {}", path.display()))
        .unwrap();
    Some(config)
}
