//! 测试公用设施：内存库、引擎桩和数据构造器

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use common::protocol::control::{EngineControl, EngineUser};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use sea_orm_migration::MigratorTrait;
use serde_json::Map;

use crate::entity::inbound::{self, Protocol};
use crate::entity::{client_traffic, ClientTraffic};
use crate::inbound_service::InboundService;
use crate::migration::Migrator;
use crate::presence::OnlineRegistry;
use crate::settings::ClientConfig;
use crate::sync::LiveSync;
use crate::traffic_service::TrafficService;

/// 连接独立的内存库并跑完全部迁移
pub async fn memory_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1);
    let db = Database::connect(opts).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// 记录调用序列的引擎桩
///
/// 每次调用以 `动作:参数:参数` 的形式存进序列，失败开关不影响记录。
#[derive(Default)]
pub struct MockEngine {
    calls: Mutex<Vec<String>>,
    fail_add_inbound: AtomicBool,
    fail_remove_inbound: AtomicBool,
    fail_add_user: AtomicBool,
    fail_remove_user: AtomicBool,
    not_found_email: Mutex<Option<String>>,
}

impl MockEngine {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// 统计以某前缀开头的调用次数
    pub fn calls_with(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    pub fn fail_add_inbound(&self) {
        self.fail_add_inbound.store(true, Ordering::SeqCst);
    }

    pub fn fail_remove_inbound(&self) {
        self.fail_remove_inbound.store(true, Ordering::SeqCst);
    }

    pub fn fail_add_user(&self) {
        self.fail_add_user.store(true, Ordering::SeqCst);
    }

    pub fn fail_remove_user(&self) {
        self.fail_remove_user.store(true, Ordering::SeqCst);
    }

    /// 让 remove_user 对指定邮箱返回引擎的"用户不存在"错误
    pub fn fail_remove_user_not_found(&self, email: &str) {
        *self.not_found_email.lock().unwrap() = Some(email.to_string());
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl EngineControl for MockEngine {
    async fn add_inbound(&self, config: &serde_json::Value) -> Result<()> {
        let tag = config["tag"].as_str().unwrap_or_default();
        self.record(format!("add_inbound:{}", tag));
        if self.fail_add_inbound.load(Ordering::SeqCst) {
            anyhow::bail!("mock: add_inbound failed");
        }
        Ok(())
    }

    async fn remove_inbound(&self, tag: &str) -> Result<()> {
        self.record(format!("remove_inbound:{}", tag));
        if self.fail_remove_inbound.load(Ordering::SeqCst) {
            anyhow::bail!("mock: remove_inbound failed");
        }
        Ok(())
    }

    async fn add_user(&self, protocol: &str, tag: &str, user: &EngineUser) -> Result<()> {
        self.record(format!("add_user:{}:{}:{}", protocol, tag, user.email));
        if self.fail_add_user.load(Ordering::SeqCst) {
            anyhow::bail!("mock: add_user failed");
        }
        Ok(())
    }

    async fn remove_user(&self, tag: &str, email: &str) -> Result<()> {
        self.record(format!("remove_user:{}:{}", tag, email));
        if let Some(not_found) = self.not_found_email.lock().unwrap().clone() {
            if not_found == email {
                anyhow::bail!("User {} not found.", email);
            }
        }
        if self.fail_remove_user.load(Ordering::SeqCst) {
            anyhow::bail!("mock: remove_user failed");
        }
        Ok(())
    }
}

/// 挂在引擎桩上的入站服务
pub fn inbound_service(engine: &Arc<MockEngine>) -> InboundService {
    InboundService::new(LiveSync::new(engine.clone()))
}

/// 挂在引擎桩上的流量服务，自带独立的在线集合
pub fn traffic_service(engine: &Arc<MockEngine>) -> TrafficService {
    TrafficService::new(LiveSync::new(engine.clone()), Arc::new(OnlineRegistry::new()))
}

/// 随机 id 的启用客户端
pub fn client(email: &str) -> ClientConfig {
    ClientConfig {
        id: uuid::Uuid::new_v4().to_string(),
        password: String::new(),
        flow: String::new(),
        email: email.to_string(),
        enable: true,
        total_gb: 0,
        expiry_time: 0,
        reset: 0,
        extra: Map::new(),
    }
}

/// 通配监听的 vmess 入站（未入库，tag 留给服务层计算）
pub fn vmess_inbound(port: u16, clients: &[ClientConfig]) -> inbound::Model {
    let settings = serde_json::json!({
        "clients": clients,
        "decryption": "none",
    });
    let now = Utc::now().naive_utc();
    inbound::Model {
        id: 0,
        up: 0,
        down: 0,
        total: 0,
        remark: String::new(),
        enable: true,
        expiry_time: 0,
        listen: String::new(),
        port,
        protocol: Protocol::Vmess,
        settings: settings.to_string(),
        stream_settings: r#"{"network":"tcp"}"#.to_string(),
        tag: String::new(),
        sniffing: r#"{"enabled":true,"destOverride":["http","tls"]}"#.to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// 台账行构造器
pub fn stat_row(inbound_id: i64, email: &str, up: i64, down: i64) -> client_traffic::Model {
    let now = Utc::now().naive_utc();
    client_traffic::Model {
        id: 0,
        inbound_id,
        email: email.to_string(),
        up,
        down,
        total: 0,
        reset: 0,
        expiry_time: 0,
        enable: true,
        created_at: now,
        updated_at: now,
    }
}

/// 直接改写台账行的计数
pub async fn set_stat_traffic(db: &DatabaseConnection, email: &str, up: i64, down: i64) {
    let row = ClientTraffic::find()
        .filter(client_traffic::Column::Email.eq(email))
        .one(db)
        .await
        .unwrap()
        .unwrap();
    let mut stat: client_traffic::ActiveModel = row.into();
    stat.up = Set(up);
    stat.down = Set(down);
    stat.update(db).await.unwrap();
}

/// 直接停用台账行，模拟早已耗尽的客户端
pub async fn disable_stat(db: &DatabaseConnection, email: &str) {
    let row = ClientTraffic::find()
        .filter(client_traffic::Column::Email.eq(email))
        .one(db)
        .await
        .unwrap()
        .unwrap();
    let mut stat: client_traffic::ActiveModel = row.into();
    stat.enable = Set(false);
    stat.update(db).await.unwrap();
}
