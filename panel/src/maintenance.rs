//! 启动期数据修复
//!
//! 两个清扫都是幂等的：紧接着的第二次运行不再产生任何变更。

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use tracing::{debug, info};

use crate::entity::inbound::Protocol;
use crate::entity::{client_traffic, inbound, ClientTraffic, Inbound};
use crate::error::Result;
use crate::inbound_service::add_client_stat;
use crate::settings::InboundSettings;

/// 规范化客户端记录
///
/// 清掉早已废弃的 xtls-rprx-direct 流控值，并为设置里有邮箱
/// 却缺台账行的客户端补行。返回修复的项数。
pub async fn normalize_client_records(db: &DatabaseConnection) -> Result<u64> {
    let txn = db.begin().await?;
    let mut repaired = 0u64;

    let inbounds = Inbound::find()
        .filter(inbound::Column::Protocol.is_in([
            Protocol::Vmess,
            Protocol::Vless,
            Protocol::Trojan,
        ]))
        .all(&txn)
        .await?;

    for row in inbounds {
        let mut settings = match InboundSettings::decode(&row.settings) {
            Ok(settings) => settings,
            Err(e) => {
                debug!("入站 #{} 设置无法解析，跳过规范化: {}", row.id, e);
                continue;
            }
        };

        let mut flow_cleared = false;
        for client in &mut settings.clients {
            if client.flow == "xtls-rprx-direct" {
                client.flow.clear();
                flow_cleared = true;
            }
        }
        if flow_cleared {
            repaired += 1;
            let encoded = settings.encode()?;
            let mut model: inbound::ActiveModel = row.clone().into();
            model.settings = Set(encoded);
            model.updated_at = Set(Utc::now().naive_utc());
            model.update(&txn).await?;
            info!("入站 #{} 的废弃流控值已清除", row.id);
        }

        // 有邮箱却没有台账行的客户端补一行
        for client in &settings.clients {
            if client.email.is_empty() {
                continue;
            }
            let count = ClientTraffic::find()
                .filter(client_traffic::Column::Email.eq(client.email.as_str()))
                .count(&txn)
                .await?;
            if count == 0 {
                add_client_stat(&txn, row.id, client).await?;
                repaired += 1;
                info!("客户端 {} 的台账行已补建", client.email);
            }
        }
    }

    txn.commit().await?;
    Ok(repaired)
}

/// 清理孤儿台账行
///
/// 删除邮箱已不在任何入站设置里的行，以及 inbound_id 为 0 的遗留行。
pub async fn remove_orphaned_traffics(db: &DatabaseConnection) -> Result<u64> {
    let mut valid = HashSet::new();
    for row in Inbound::find().all(db).await? {
        match InboundSettings::decode(&row.settings) {
            Ok(settings) => {
                for client in &settings.clients {
                    if !client.email.is_empty() {
                        valid.insert(client.email.clone());
                    }
                }
            }
            Err(e) => debug!("入站 #{} 设置无法解析，清扫时跳过: {}", row.id, e),
        }
    }

    let cond = Condition::any()
        .add(client_traffic::Column::InboundId.eq(0))
        .add(client_traffic::Column::Email.is_not_in(valid));
    let res = ClientTraffic::delete_many().filter(cond).exec(db).await?;
    if res.rows_affected > 0 {
        info!("已清理 {} 条孤儿流量记录", res.rows_affected);
    }
    Ok(res.rows_affected)
}

/// 启动时跑一遍全部修复清扫
pub async fn run_startup_repairs(db: &DatabaseConnection) -> Result<()> {
    let repaired = normalize_client_records(db).await?;
    let removed = remove_orphaned_traffics(db).await?;
    if repaired > 0 || removed > 0 {
        info!("✅ 数据修复完成: 规范化 {} 项, 清理 {} 条孤儿记录", repaired, removed);
    }
    Ok(())
}
