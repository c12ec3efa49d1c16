use std::sync::Arc;

use anyhow::Result;
use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use panel::config::get_config;
use panel::engine_client::RemoteEngineControl;
use panel::maintenance;
use panel::migration::{self, get_connection};
use panel::presence::OnlineRegistry;
use panel::sync::LiveSync;
use panel::traffic_service::{start_traffic_poll, TrafficService};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化 tracing 日志系统
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx::query=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .init();

    // 读取配置
    let config = get_config().await;
    info!("📋 panel 启动");
    info!("🔗 引擎内部 API: {}", config.engine_api_url);
    info!("⏱️ 流量采集周期: {} 秒", config.poll_interval_secs);

    // 初始化数据库
    let db = get_connection().await;
    // 运行数据库迁移
    migration::Migrator::up(db, None).await?;
    info!("✅ 数据库初始化完成");

    // 修复历史数据
    maintenance::run_startup_repairs(db).await?;

    // 远端引擎既是控制通道也是流量来源
    let engine = Arc::new(RemoteEngineControl::new(
        config.engine_api_url.clone(),
        config.get_engine_secret(),
    ));

    let online = Arc::new(OnlineRegistry::new());
    let traffic_service = Arc::new(TrafficService::new(LiveSync::new(engine.clone()), online));

    // 启动周期性流量对账
    start_traffic_poll(traffic_service, engine, config.poll_interval_secs);

    // 等待终止信号
    info!("✅ 所有服务已启动，等待终止信号...");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("收到 Ctrl+C 信号，正在关闭服务...");
        }
        _ = async {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{signal, SignalKind};
                let mut sigterm = signal(SignalKind::terminate()).expect("failed to listen for SIGTERM");
                sigterm.recv().await;
            }
            #[cfg(not(unix))]
            {
                std::future::pending::<()>().await;
            }
        } => {
            info!("收到 SIGTERM 信号，正在关闭服务...");
        }
    }

    Ok(())
}
