//! 周期性流量对账
//!
//! 每个采集周期执行一次：套用入站与客户端的流量增量、落定待定
//! 过期时间、整体替换在线集合、自动续期、停用超限或到期的客户端
//! 与入站。所有存储写入在一个事务内，任何一步失败整个周期回滚。

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use common::protocol::traffic::{ClientTrafficRecord, TrafficRecord, TrafficReport, TrafficSource};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use tracing::{debug, warn};

use crate::entity::inbound::Protocol;
use crate::entity::{client_traffic, inbound, ClientTraffic, Inbound};
use crate::error::Result;
use crate::presence::OnlineRegistry;
use crate::settings::{ClientConfig, ExpiryState, InboundSettings};
use crate::sync::{cipher_for, LiveSync, SyncOutcome};

/// 一天的毫秒数
const DAY_MS: i64 = 86_400_000;

/// 判断计数是否超限或到期
///
/// 配额为 0 表示不限量，过期时间为 0 表示永不过期。
pub fn is_depleted(up: i64, down: i64, total: i64, expiry_time: i64, now_ms: i64) -> bool {
    let over_quota = total > 0 && up + down >= total;
    let expired = expiry_time > 0 && expiry_time <= now_ms;
    over_quota || expired
}

/// 单个对账周期的结果
#[derive(Debug, Clone, Copy)]
pub struct TickReport {
    /// 自动续期的客户端数
    pub renewed: u64,
    /// 本周期停用的客户端数
    pub disabled_clients: u64,
    /// 本周期停用的入站数
    pub disabled_inbounds: u64,
    /// 合并后的引擎同步结果
    pub outcome: SyncOutcome,
}

/// 流量对账服务
pub struct TrafficService {
    sync: LiveSync,
    online: Arc<OnlineRegistry>,
}

impl TrafficService {
    pub fn new(sync: LiveSync, online: Arc<OnlineRegistry>) -> Self {
        TrafficService { sync, online }
    }

    /// 最近一个周期在线的客户端邮箱
    pub async fn get_online_clients(&self) -> Vec<String> {
        self.online.snapshot().await
    }

    /// 套用一个周期的流量增量并执行对账
    pub async fn add_traffic(
        &self,
        db: &DatabaseConnection,
        report: &TrafficReport,
    ) -> Result<TickReport> {
        let txn = db.begin().await?;

        apply_inbound_traffic(&txn, &report.inbounds).await?;
        let online = apply_client_traffic(&txn, &report.clients).await?;
        // 在线集合整体替换，没有流量的周期也要清空
        self.online.replace(online).await;

        let (renewed, renew_outcome) = self.renew_expired_clients(&txn).await?;
        let (disabled_clients, client_outcome) = self.disable_depleted_clients(&txn).await?;
        let (disabled_inbounds, inbound_outcome) = self.disable_depleted_inbounds(&txn).await?;

        txn.commit().await?;

        Ok(TickReport {
            renewed,
            disabled_clients,
            disabled_inbounds,
            outcome: renew_outcome.merge(client_outcome).merge(inbound_outcome),
        })
    }

    /// 自动续期：到期且配置了续期周期的行，把过期时间推进整数个周期
    ///
    /// 续期同时清零计数并重新启用；行曾被停用的客户端续期后补推回引擎。
    async fn renew_expired_clients(
        &self,
        txn: &DatabaseTransaction,
    ) -> Result<(u64, SyncOutcome)> {
        let now_ms = Utc::now().timestamp_millis();
        let rows = ClientTraffic::find()
            .filter(client_traffic::Column::Reset.gt(0))
            .filter(client_traffic::Column::ExpiryTime.gt(0))
            .filter(client_traffic::Column::ExpiryTime.lte(now_ms))
            .all(txn)
            .await?;
        if rows.is_empty() {
            return Ok((0, SyncOutcome::Applied));
        }

        let mut inbounds = load_inbounds(txn, rows.iter().map(|r| r.inbound_id)).await?;
        let mut pushes: Vec<(Protocol, String, ClientConfig, String)> = Vec::new();
        let now = Utc::now().naive_utc();
        let count = rows.len() as u64;

        for row in rows {
            let period = row.reset as i64 * DAY_MS;
            let mut new_expiry = row.expiry_time;
            while new_expiry <= now_ms {
                new_expiry += period;
            }
            debug!("客户端 {} 自动续期 {} 天", row.email, row.reset);

            if let Some(ib) = inbounds.get_mut(&row.inbound_id) {
                let mut settings = InboundSettings::decode(&ib.settings)?;
                let mut changed = false;
                for client in &mut settings.clients {
                    if client.email == row.email {
                        client.expiry_time = new_expiry;
                        changed = true;
                    }
                }
                if changed {
                    // 行曾被停用说明用户已被引擎摘除，续期后要补推
                    if !row.enable {
                        if let Some(client) = settings
                            .clients
                            .iter()
                            .find(|c| c.email == row.email && c.enable)
                        {
                            let cipher = cipher_for(ib.protocol, &settings);
                            pushes.push((ib.protocol, ib.tag.clone(), client.clone(), cipher));
                        }
                    }
                    ib.settings = settings.encode()?;
                    let mut model: inbound::ActiveModel = ib.clone().into();
                    model.settings = Set(ib.settings.clone());
                    model.updated_at = Set(now);
                    model.update(txn).await?;
                }
            }

            let mut stat: client_traffic::ActiveModel = row.into();
            stat.expiry_time = Set(new_expiry);
            stat.up = Set(0);
            stat.down = Set(0);
            stat.enable = Set(true);
            stat.updated_at = Set(now);
            stat.update(txn).await?;
        }

        let mut outcome = SyncOutcome::Applied;
        for (protocol, tag, client, cipher) in pushes {
            outcome = outcome.merge(self.sync.push_user(protocol, &tag, &client, &cipher).await);
        }
        Ok((count, outcome))
    }

    /// 停用超限或到期的客户端，并逐个从引擎摘除
    async fn disable_depleted_clients(
        &self,
        txn: &DatabaseTransaction,
    ) -> Result<(u64, SyncOutcome)> {
        let now_ms = Utc::now().timestamp_millis();
        let rows = ClientTraffic::find()
            .filter(client_traffic::Column::Enable.eq(true))
            .all(txn)
            .await?;
        let depleted: Vec<client_traffic::Model> = rows
            .into_iter()
            .filter(|r| is_depleted(r.up, r.down, r.total, r.expiry_time, now_ms))
            .collect();
        if depleted.is_empty() {
            return Ok((0, SyncOutcome::Applied));
        }

        let inbounds = load_inbounds(txn, depleted.iter().map(|r| r.inbound_id)).await?;
        let now = Utc::now().naive_utc();
        let mut outcome = SyncOutcome::Applied;
        let count = depleted.len() as u64;

        for row in depleted {
            if let Some(ib) = inbounds.get(&row.inbound_id) {
                outcome = outcome.merge(self.sync.drop_user(&ib.tag, &row.email).await);
            }
            debug!("客户端 {} 超限停用", row.email);

            let mut stat: client_traffic::ActiveModel = row.into();
            stat.enable = Set(false);
            stat.updated_at = Set(now);
            stat.update(txn).await?;
        }
        Ok((count, outcome))
    }

    /// 停用超限或到期的入站，并摘除其监听
    async fn disable_depleted_inbounds(
        &self,
        txn: &DatabaseTransaction,
    ) -> Result<(u64, SyncOutcome)> {
        let now_ms = Utc::now().timestamp_millis();
        let rows = Inbound::find()
            .filter(inbound::Column::Enable.eq(true))
            .all(txn)
            .await?;
        let depleted: Vec<inbound::Model> = rows
            .into_iter()
            .filter(|r| is_depleted(r.up, r.down, r.total, r.expiry_time, now_ms))
            .collect();
        if depleted.is_empty() {
            return Ok((0, SyncOutcome::Applied));
        }

        let now = Utc::now().naive_utc();
        let mut outcome = SyncOutcome::Applied;
        let count = depleted.len() as u64;

        for row in depleted {
            outcome = outcome.merge(self.sync.drop_inbound(&row.tag).await);
            warn!("入站 {} 超限停用", row.tag);

            let mut model: inbound::ActiveModel = row.into();
            model.enable = Set(false);
            model.updated_at = Set(now);
            model.update(txn).await?;
        }
        Ok((count, outcome))
    }
}

/// 按 tag 累加入站计数，出站方向与未知 tag 的记录跳过
async fn apply_inbound_traffic(
    txn: &DatabaseTransaction,
    records: &[TrafficRecord],
) -> Result<()> {
    let now = Utc::now().naive_utc();
    for record in records {
        if !record.is_inbound {
            continue;
        }
        let Some(row) = Inbound::find()
            .filter(inbound::Column::Tag.eq(record.tag.as_str()))
            .one(txn)
            .await?
        else {
            continue;
        };
        let new_up = row.up + record.up;
        let new_down = row.down + record.down;
        let mut model: inbound::ActiveModel = row.into();
        model.up = Set(new_up);
        model.down = Set(new_down);
        model.updated_at = Set(now);
        model.update(txn).await?;
    }
    Ok(())
}

/// 按邮箱累加客户端计数，返回本周期产生过流量的邮箱
///
/// 没有台账行的邮箱直接跳过，不会凭增量新建行。
async fn apply_client_traffic(
    txn: &DatabaseTransaction,
    records: &[ClientTrafficRecord],
) -> Result<Vec<String>> {
    if records.is_empty() {
        return Ok(Vec::new());
    }
    let emails: Vec<&str> = records.iter().map(|r| r.email.as_str()).collect();
    let mut rows = ClientTraffic::find()
        .filter(client_traffic::Column::Email.is_in(emails))
        .all(txn)
        .await?;

    resolve_pending_expiries(txn, &mut rows).await?;

    let mut deltas: HashMap<&str, (i64, i64)> = HashMap::new();
    for record in records {
        deltas.insert(record.email.as_str(), (record.up, record.down));
    }

    let mut online = Vec::new();
    let now = Utc::now().naive_utc();
    for row in rows {
        let Some(&(up, down)) = deltas.get(row.email.as_str()) else {
            continue;
        };
        if up > 0 || down > 0 {
            online.push(row.email.clone());
        }
        let new_up = row.up + up;
        let new_down = row.down + down;
        let mut stat: client_traffic::ActiveModel = row.into();
        stat.up = Set(new_up);
        stat.down = Set(new_down);
        stat.updated_at = Set(now);
        stat.update(txn).await?;
    }
    Ok(online)
}

/// 把行内为负的过期时间在首次记账时落定为绝对时间
///
/// 台账行和设置里的对应客户端一起改写，保证两处一致。
async fn resolve_pending_expiries(
    txn: &DatabaseTransaction,
    rows: &mut [client_traffic::Model],
) -> Result<()> {
    let now_ms = Utc::now().timestamp_millis();
    let pending: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| r.expiry_time < 0)
        .map(|(i, _)| i)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let mut inbounds = load_inbounds(txn, pending.iter().map(|&i| rows[i].inbound_id)).await?;
    let now = Utc::now().naive_utc();

    for &i in &pending {
        let row = &mut rows[i];
        let Some(resolved) = ExpiryState::from_millis(row.expiry_time).resolve_at(now_ms) else {
            continue;
        };
        debug!("客户端 {} 的计时套餐开始计时", row.email);

        if let Some(ib) = inbounds.get_mut(&row.inbound_id) {
            let mut settings = InboundSettings::decode(&ib.settings)?;
            let mut changed = false;
            for client in &mut settings.clients {
                if client.email == row.email {
                    client.expiry_time = resolved;
                    changed = true;
                }
            }
            if changed {
                ib.settings = settings.encode()?;
                let mut model: inbound::ActiveModel = ib.clone().into();
                model.settings = Set(ib.settings.clone());
                model.updated_at = Set(now);
                model.update(txn).await?;
            }
        }

        let mut stat: client_traffic::ActiveModel = row.clone().into();
        stat.expiry_time = Set(resolved);
        stat.updated_at = Set(now);
        stat.update(txn).await?;
        row.expiry_time = resolved;
    }
    Ok(())
}

/// 按 id 批量装载入站
async fn load_inbounds(
    txn: &DatabaseTransaction,
    ids: impl Iterator<Item = i64>,
) -> Result<HashMap<i64, inbound::Model>> {
    let ids: HashSet<i64> = ids.collect();
    let rows = Inbound::find()
        .filter(inbound::Column::Id.is_in(ids))
        .all(txn)
        .await?;
    Ok(rows.into_iter().map(|m| (m.id, m)).collect())
}

/// 启动周期性流量对账后台任务
pub fn start_traffic_poll(
    service: Arc<TrafficService>,
    source: Arc<dyn TrafficSource>,
    interval_secs: u64,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

        loop {
            interval.tick().await;

            let report = match source.poll_traffic(true).await {
                Ok(report) => report,
                Err(e) => {
                    warn!("拉取引擎流量失败: {}", e);
                    continue;
                }
            };

            let db = crate::migration::get_connection().await;
            match service.add_traffic(db, &report).await {
                Ok(tick) => {
                    if tick.renewed > 0 || tick.disabled_clients > 0 || tick.disabled_inbounds > 0 {
                        debug!(
                            "对账完成: 续期 {}, 停用客户端 {}, 停用入站 {}",
                            tick.renewed, tick.disabled_clients, tick.disabled_inbounds
                        );
                    }
                    if tick.outcome.needs_restart() {
                        warn!("⚠️ 引擎状态与存储配置出现偏离，需要重启引擎对齐");
                    }
                }
                Err(e) => warn!("流量对账失败: {}", e),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_util::{
        client, inbound_service, memory_db, traffic_service, vmess_inbound, MockEngine,
    };

    fn inbound_record(tag: &str, up: i64, down: i64) -> TrafficRecord {
        TrafficRecord {
            tag: tag.to_string(),
            is_inbound: true,
            up,
            down,
        }
    }

    fn client_record(email: &str, up: i64, down: i64) -> ClientTrafficRecord {
        ClientTrafficRecord {
            email: email.to_string(),
            up,
            down,
        }
    }

    #[test]
    fn test_is_depleted() {
        let now = 1_700_000_000_000;
        // 配额 0 不限量，过期时间 0 永不过期
        assert!(!is_depleted(100, 100, 0, 0, now));
        // 刚好用满算超限
        assert!(is_depleted(600, 400, 1000, 0, now));
        assert!(!is_depleted(600, 399, 1000, 0, now));
        // 到期时刻本身算过期
        assert!(is_depleted(0, 0, 0, now, now));
        assert!(!is_depleted(0, 0, 0, now + 1, now));
        // 负过期时间是未落定的计时套餐，不算过期
        assert!(!is_depleted(0, 0, 0, -DAY_MS, now));
    }

    #[tokio::test]
    async fn test_tick_applies_deltas_and_tracks_online() {
        let engine = Arc::new(MockEngine::default());
        let db = memory_db().await;
        let svc = inbound_service(&engine);
        let traffic = traffic_service(&engine);

        let (model, _) = svc
            .add_inbound(&db, vmess_inbound(20001, &[client("a@x"), client("b@x")]), vec![])
            .await
            .unwrap();

        let report = TrafficReport {
            inbounds: vec![
                inbound_record("inbound-20001", 100, 200),
                // 出站方向与未知 tag 都不落账
                TrafficRecord { tag: "out".to_string(), is_inbound: false, up: 5, down: 5 },
                inbound_record("inbound-99999", 7, 7),
            ],
            clients: vec![client_record("a@x", 40, 60), client_record("ghost@x", 1, 1)],
        };
        let tick = traffic.add_traffic(&db, &report).await.unwrap();
        assert!(!tick.outcome.needs_restart());
        assert_eq!(tick.disabled_clients, 0);

        let fresh = svc.get_inbound(&db, model.id).await.unwrap();
        assert_eq!((fresh.up, fresh.down), (100, 200));
        let row = svc
            .get_client_traffic_by_email(&db, "a@x")
            .await
            .unwrap()
            .unwrap();
        assert_eq!((row.up, row.down), (40, 60));
        // 未知邮箱不会凭增量新建行
        assert!(svc.get_client_traffic_by_email(&db, "ghost@x").await.unwrap().is_none());

        // 只有产生流量的已知邮箱在线
        assert_eq!(traffic.get_online_clients().await, vec!["a@x".to_string()]);

        // 第二个周期累加，没有流量的周期清空在线集合
        traffic.add_traffic(&db, &TrafficReport {
            inbounds: vec![inbound_record("inbound-20001", 1, 1)],
            clients: vec![],
        })
        .await
        .unwrap();
        let fresh = svc.get_inbound(&db, model.id).await.unwrap();
        assert_eq!((fresh.up, fresh.down), (101, 201));
        assert!(traffic.get_online_clients().await.is_empty());
    }

    #[tokio::test]
    async fn test_pending_expiry_resolved_on_first_traffic() {
        let engine = Arc::new(MockEngine::default());
        let db = memory_db().await;
        let svc = inbound_service(&engine);
        let traffic = traffic_service(&engine);

        let mut timed = client("a@x");
        timed.expiry_time = -(5 * DAY_MS);
        let (model, _) = svc
            .add_inbound(&db, vmess_inbound(20001, &[timed]), vec![])
            .await
            .unwrap();

        // 没有流量之前保持待定
        traffic.add_traffic(&db, &TrafficReport::default()).await.unwrap();
        let row = svc.get_client_traffic_by_email(&db, "a@x").await.unwrap().unwrap();
        assert_eq!(row.expiry_time, -(5 * DAY_MS));

        let before = Utc::now().timestamp_millis();
        let report = TrafficReport {
            inbounds: vec![],
            clients: vec![client_record("a@x", 10, 10)],
        };
        traffic.add_traffic(&db, &report).await.unwrap();

        // 首次流量把负时长换算成绝对到期时间
        let row = svc.get_client_traffic_by_email(&db, "a@x").await.unwrap().unwrap();
        assert!(row.expiry_time >= before + 5 * DAY_MS);
        assert!(row.expiry_time <= Utc::now().timestamp_millis() + 5 * DAY_MS);

        // 设置里的客户端同步改写
        let settings =
            InboundSettings::decode(&svc.get_inbound(&db, model.id).await.unwrap().settings)
                .unwrap();
        assert_eq!(settings.clients[0].expiry_time, row.expiry_time);

        // 再次记账不再改动
        let fixed = row.expiry_time;
        traffic.add_traffic(&db, &report).await.unwrap();
        let row = svc.get_client_traffic_by_email(&db, "a@x").await.unwrap().unwrap();
        assert_eq!(row.expiry_time, fixed);
    }

    #[tokio::test]
    async fn test_quota_depletion_disables_client() {
        let engine = Arc::new(MockEngine::default());
        let db = memory_db().await;
        let svc = inbound_service(&engine);
        let traffic = traffic_service(&engine);

        let mut capped = client("a@x");
        capped.total_gb = 1000;
        svc.add_inbound(&db, vmess_inbound(20001, &[capped, client("b@x")]), vec![])
            .await
            .unwrap();

        // 未到配额不停用
        let tick = traffic
            .add_traffic(&db, &TrafficReport {
                inbounds: vec![],
                clients: vec![client_record("a@x", 300, 300)],
            })
            .await
            .unwrap();
        assert_eq!(tick.disabled_clients, 0);

        // 累计到配额即停用并从引擎摘除
        let tick = traffic
            .add_traffic(&db, &TrafficReport {
                inbounds: vec![],
                clients: vec![client_record("a@x", 300, 200)],
            })
            .await
            .unwrap();
        assert_eq!(tick.disabled_clients, 1);
        assert!(!tick.outcome.needs_restart());
        assert_eq!(engine.calls_with("remove_user:inbound-20001:a@x"), 1);

        let row = svc.get_client_traffic_by_email(&db, "a@x").await.unwrap().unwrap();
        assert!(!row.enable);
        // 无配额的客户端不受影响
        let row = svc.get_client_traffic_by_email(&db, "b@x").await.unwrap().unwrap();
        assert!(row.enable);

        // 已停用的行不会被重复处理
        let tick = traffic.add_traffic(&db, &TrafficReport::default()).await.unwrap();
        assert_eq!(tick.disabled_clients, 0);
        assert_eq!(engine.calls_with("remove_user:inbound-20001:a@x"), 1);
    }

    #[tokio::test]
    async fn test_expired_client_disabled() {
        let engine = Arc::new(MockEngine::default());
        let db = memory_db().await;
        let svc = inbound_service(&engine);
        let traffic = traffic_service(&engine);

        let mut expired = client("a@x");
        expired.expiry_time = Utc::now().timestamp_millis() - 3_600_000;
        svc.add_inbound(&db, vmess_inbound(20001, &[expired]), vec![])
            .await
            .unwrap();

        let tick = traffic.add_traffic(&db, &TrafficReport::default()).await.unwrap();
        assert_eq!(tick.disabled_clients, 1);
        assert_eq!(engine.calls_with("remove_user:inbound-20001:a@x"), 1);
    }

    #[tokio::test]
    async fn test_auto_renewal_advances_expiry() {
        let engine = Arc::new(MockEngine::default());
        let db = memory_db().await;
        let svc = inbound_service(&engine);
        let traffic = traffic_service(&engine);

        let now_ms = Utc::now().timestamp_millis();
        let mut renewing = client("a@x");
        renewing.reset = 30;
        renewing.expiry_time = now_ms - 65 * DAY_MS;
        let (model, _) = svc
            .add_inbound(&db, vmess_inbound(20001, &[renewing]), vec![])
            .await
            .unwrap();
        // 模拟一段已被停用、攒了计数的历史
        crate::test_util::set_stat_traffic(&db, "a@x", 700, 300).await;
        crate::test_util::disable_stat(&db, "a@x").await;

        let tick = traffic.add_traffic(&db, &TrafficReport::default()).await.unwrap();
        assert_eq!(tick.renewed, 1);
        assert_eq!(tick.disabled_clients, 0);
        assert!(!tick.outcome.needs_restart());

        // 过期时间推进整数个周期，落在未来一个周期以内
        let row = svc.get_client_traffic_by_email(&db, "a@x").await.unwrap().unwrap();
        let now_ms = Utc::now().timestamp_millis();
        assert!(row.expiry_time > now_ms);
        assert!(row.expiry_time <= now_ms + 30 * DAY_MS);
        // 计数清零并重新启用
        assert!(row.enable);
        assert_eq!((row.up, row.down), (0, 0));

        // 设置同步改写，曾被摘除的用户补推一次
        let settings =
            InboundSettings::decode(&svc.get_inbound(&db, model.id).await.unwrap().settings)
                .unwrap();
        assert_eq!(settings.clients[0].expiry_time, row.expiry_time);
        assert_eq!(engine.calls_with("add_user:vmess:inbound-20001:a@x"), 1);

        // 续期后的行不会再次命中
        let tick = traffic.add_traffic(&db, &TrafficReport::default()).await.unwrap();
        assert_eq!(tick.renewed, 0);
    }

    #[tokio::test]
    async fn test_inbound_quota_depletion_disables_listener() {
        let engine = Arc::new(MockEngine::default());
        let db = memory_db().await;
        let svc = inbound_service(&engine);
        let traffic = traffic_service(&engine);

        let mut capped = vmess_inbound(20001, &[client("a@x")]);
        capped.total = 500;
        let (model, _) = svc.add_inbound(&db, capped, vec![]).await.unwrap();

        let tick = traffic
            .add_traffic(&db, &TrafficReport {
                inbounds: vec![inbound_record("inbound-20001", 300, 300)],
                clients: vec![],
            })
            .await
            .unwrap();
        assert_eq!(tick.disabled_inbounds, 1);
        assert_eq!(engine.calls_with("remove_inbound:inbound-20001"), 1);

        let fresh = svc.get_inbound(&db, model.id).await.unwrap();
        assert!(!fresh.enable);

        // 已停用的入站不再重复摘除
        let tick = traffic.add_traffic(&db, &TrafficReport::default()).await.unwrap();
        assert_eq!(tick.disabled_inbounds, 0);
        assert_eq!(engine.calls_with("remove_inbound:inbound-20001"), 1);
    }

    #[tokio::test]
    async fn test_live_failure_marks_drift_but_commits() {
        let engine = Arc::new(MockEngine::default());
        let db = memory_db().await;
        let svc = inbound_service(&engine);
        let traffic = traffic_service(&engine);

        let mut expired = client("a@x");
        expired.expiry_time = Utc::now().timestamp_millis() - 1000;
        svc.add_inbound(&db, vmess_inbound(20001, &[expired]), vec![])
            .await
            .unwrap();

        engine.fail_remove_user();
        let tick = traffic.add_traffic(&db, &TrafficReport::default()).await.unwrap();
        // 摘除失败只标记偏离，停用照常落库
        assert!(tick.outcome.needs_restart());
        assert_eq!(tick.disabled_clients, 1);
        let row = svc.get_client_traffic_by_email(&db, "a@x").await.unwrap().unwrap();
        assert!(!row.enable);
    }
}
