//! 入站与客户端的变更服务
//!
//! 面板的唯一写入口：入站的增删改、内嵌客户端集合的增删改、
//! 流量台账的派生维护，以及向代理引擎的在线同步。
//! 所有存储写入在单个事务内完成，事务提交后才向引擎推送；
//! 推送失败不回滚存储，只通过返回的 [`SyncOutcome`] 标记偏离。

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, EntityTrait,
    NotSet, PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::{debug, info};

use crate::entity::{client_traffic, inbound, ClientTraffic, Inbound};
use crate::error::{Result, ServiceError};
use crate::settings::{client_key, validate_clients, ClientConfig, InboundSettings};
use crate::sync::{cipher_for, LiveSync, SyncOutcome};

/// 通配监听地址，绑定其上的入站与同端口的任何入站都冲突
const ANY_LISTENS: [&str; 4] = ["", "0.0.0.0", "::", "::0"];

/// 判断监听地址是否为通配
pub fn is_any_listen(listen: &str) -> bool {
    ANY_LISTENS.contains(&listen)
}

/// 入站 tag 由监听地址和端口唯一确定
pub fn build_tag(listen: &str, port: u16) -> String {
    if is_any_listen(listen) {
        format!("inbound-{}", port)
    } else {
        format!("inbound-{}:{}", listen, port)
    }
}

/// 入站变更服务
pub struct InboundService {
    sync: LiveSync,
}

impl InboundService {
    pub fn new(sync: LiveSync) -> Self {
        InboundService { sync }
    }

    /// 新增入站
    ///
    /// `imported_stats` 非空表示导入流程：台账行沿用导入数据的
    /// 计数与启用状态，不再按设置里的客户端新建。
    pub async fn add_inbound(
        &self,
        db: &DatabaseConnection,
        data: inbound::Model,
        imported_stats: Vec<client_traffic::Model>,
    ) -> Result<(inbound::Model, SyncOutcome)> {
        let txn = db.begin().await?;

        check_port_conflict(&txn, &data.listen, data.port, None).await?;

        let settings = InboundSettings::decode(&data.settings)?;
        validate_clients(data.protocol, &settings.clients)?;
        ensure_unique_emails(&txn, &settings.clients).await?;

        let now = Utc::now().naive_utc();
        let tag = build_tag(&data.listen, data.port);
        let model = inbound::ActiveModel {
            id: NotSet,
            up: Set(data.up),
            down: Set(data.down),
            total: Set(data.total),
            remark: Set(data.remark.clone()),
            enable: Set(data.enable),
            expiry_time: Set(data.expiry_time),
            listen: Set(data.listen.clone()),
            port: Set(data.port),
            protocol: Set(data.protocol),
            settings: Set(data.settings.clone()),
            stream_settings: Set(data.stream_settings.clone()),
            tag: Set(tag),
            sniffing: Set(data.sniffing.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        if imported_stats.is_empty() {
            for client in &settings.clients {
                if !client.email.is_empty() {
                    add_client_stat(&txn, model.id, client).await?;
                }
            }
        } else {
            for stat in imported_stats {
                let row = client_traffic::ActiveModel {
                    id: NotSet,
                    inbound_id: Set(model.id),
                    email: Set(stat.email),
                    up: Set(stat.up),
                    down: Set(stat.down),
                    total: Set(stat.total),
                    reset: Set(stat.reset),
                    expiry_time: Set(stat.expiry_time),
                    enable: Set(stat.enable),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                row.insert(&txn).await?;
            }
        }

        txn.commit().await?;
        info!("入站 {} 已创建, 协议 {}", model.tag, model.protocol.as_str());

        let mut outcome = SyncOutcome::Applied;
        if model.enable {
            outcome = self.sync.push_inbound(&model).await;
        }
        Ok((model, outcome))
    }

    /// 整体更新入站
    ///
    /// 监听或端口变化会换一个新 tag；引擎侧先按旧 tag 摘除，
    /// 再按新配置整体重建。
    pub async fn update_inbound(
        &self,
        db: &DatabaseConnection,
        id: i64,
        data: inbound::Model,
    ) -> Result<(inbound::Model, SyncOutcome)> {
        let txn = db.begin().await?;

        check_port_conflict(&txn, &data.listen, data.port, Some(id)).await?;

        let old = Inbound::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::InboundNotFound(id))?;

        diff_client_stats(&txn, &old, &data).await?;

        let old_tag = old.tag.clone();
        let tag = build_tag(&data.listen, data.port);
        let mut model: inbound::ActiveModel = old.into();
        model.up = Set(data.up);
        model.down = Set(data.down);
        model.total = Set(data.total);
        model.remark = Set(data.remark.clone());
        model.enable = Set(data.enable);
        model.expiry_time = Set(data.expiry_time);
        model.listen = Set(data.listen.clone());
        model.port = Set(data.port);
        model.protocol = Set(data.protocol);
        model.settings = Set(data.settings.clone());
        model.stream_settings = Set(data.stream_settings.clone());
        model.tag = Set(tag);
        model.sniffing = Set(data.sniffing.clone());
        model.updated_at = Set(Utc::now().naive_utc());
        let updated = model.update(&txn).await?;

        txn.commit().await?;

        // 旧 tag 无条件尝试摘除，仍启用则按新配置重建
        let mut outcome = self.sync.drop_inbound(&old_tag).await;
        if updated.enable {
            outcome = outcome.merge(self.sync.push_inbound(&updated).await);
        }
        Ok((updated, outcome))
    }

    /// 删除入站及其全部台账行
    pub async fn del_inbound(&self, db: &DatabaseConnection, id: i64) -> Result<SyncOutcome> {
        let txn = db.begin().await?;
        let inbound = Inbound::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::InboundNotFound(id))?;

        // 先摘除运行中的监听，再删存储
        let mut outcome = SyncOutcome::Applied;
        if inbound.enable {
            outcome = self.sync.drop_inbound(&inbound.tag).await;
        }

        ClientTraffic::delete_many()
            .filter(client_traffic::Column::InboundId.eq(id))
            .exec(&txn)
            .await?;
        Inbound::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!("入站 #{} ({}) 已删除", id, inbound.tag);
        Ok(outcome)
    }

    /// 向已有入站追加客户端
    pub async fn add_inbound_clients(
        &self,
        db: &DatabaseConnection,
        inbound_id: i64,
        clients: Vec<ClientConfig>,
    ) -> Result<SyncOutcome> {
        let txn = db.begin().await?;
        let inbound = Inbound::find_by_id(inbound_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::InboundNotFound(inbound_id))?;

        let mut settings = InboundSettings::decode(&inbound.settings)?;

        // 新客户端自检，再与已有客户端的标识互斥
        validate_clients(inbound.protocol, &clients)?;
        let mut existing_keys = HashSet::new();
        for client in &settings.clients {
            if let Ok(key) = client_key(inbound.protocol, client) {
                existing_keys.insert(key.value().to_string());
            }
        }
        for client in &clients {
            let key = client_key(inbound.protocol, client)?;
            if existing_keys.contains(key.value()) {
                return Err(ServiceError::DuplicateClientId(key.value().to_string()));
            }
        }
        ensure_unique_emails(&txn, &clients).await?;

        settings.clients.extend(clients.iter().cloned());
        let mut model: inbound::ActiveModel = inbound.clone().into();
        model.settings = Set(settings.encode()?);
        model.updated_at = Set(Utc::now().naive_utc());
        model.update(&txn).await?;

        for client in &clients {
            if !client.email.is_empty() {
                add_client_stat(&txn, inbound_id, client).await?;
            }
        }
        txn.commit().await?;

        // 没有邮箱的客户端无法单独推送，只能整体重启对齐
        let cipher = cipher_for(inbound.protocol, &settings);
        let mut outcome = SyncOutcome::Applied;
        for client in &clients {
            if client.email.is_empty() {
                outcome = outcome.merge(SyncOutcome::AppliedWithDrift);
                continue;
            }
            if client.enable {
                outcome = outcome.merge(
                    self.sync
                        .push_user(inbound.protocol, &inbound.tag, client, &cipher)
                        .await,
                );
            }
        }
        Ok(outcome)
    }

    /// 按标识更新单个客户端
    ///
    /// `identifier` 是协议对应的身份凭据（id / password / email），
    /// 更新保持客户端在集合内的原有位置。
    pub async fn update_inbound_client(
        &self,
        db: &DatabaseConnection,
        inbound_id: i64,
        identifier: &str,
        client: ClientConfig,
    ) -> Result<SyncOutcome> {
        let txn = db.begin().await?;
        let inbound = Inbound::find_by_id(inbound_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::InboundNotFound(inbound_id))?;

        let mut settings = InboundSettings::decode(&inbound.settings)?;
        let new_key = client_key(inbound.protocol, &client)?.value().to_string();

        let mut index = None;
        for (i, existing) in settings.clients.iter().enumerate() {
            if let Ok(key) = client_key(inbound.protocol, existing) {
                if key.value() == identifier {
                    index = Some(i);
                    break;
                }
            }
        }
        let index = index.ok_or_else(|| ServiceError::ClientNotFound(identifier.to_string()))?;

        // 新标识不得与集合里其他客户端撞车
        for (i, existing) in settings.clients.iter().enumerate() {
            if i == index {
                continue;
            }
            if let Ok(key) = client_key(inbound.protocol, existing) {
                if key.value() == new_key {
                    return Err(ServiceError::DuplicateClientId(new_key));
                }
            }
        }

        let old_client = settings.clients[index].clone();
        let old_email = old_client.email.clone();
        if !client.email.is_empty() && client.email != old_email {
            ensure_unique_emails(&txn, std::slice::from_ref(&client)).await?;
        }

        settings.clients[index] = client.clone();
        let mut model: inbound::ActiveModel = inbound.clone().into();
        model.settings = Set(settings.encode()?);
        model.updated_at = Set(Utc::now().naive_utc());
        model.update(&txn).await?;

        if !client.email.is_empty() {
            if !old_email.is_empty() {
                update_client_stat(&txn, &old_email, &client).await?;
            } else {
                add_client_stat(&txn, inbound_id, &client).await?;
            }
        } else {
            del_client_stat(&txn, &old_email).await?;
        }
        txn.commit().await?;

        // 旧客户端没有邮箱就无法定位引擎里的用户，只能整体重启
        if old_email.is_empty() {
            return Ok(SyncOutcome::AppliedWithDrift);
        }

        let cipher = cipher_for(inbound.protocol, &settings);
        let mut outcome = SyncOutcome::Applied;
        if old_client.enable {
            outcome = outcome.merge(self.sync.drop_user(&inbound.tag, &old_email).await);
        }
        if client.enable && !client.email.is_empty() {
            outcome = outcome.merge(
                self.sync
                    .push_user(inbound.protocol, &inbound.tag, &client, &cipher)
                    .await,
            );
        }
        Ok(outcome)
    }

    /// 按标识删除单个客户端
    ///
    /// 入站至少要保留一个客户端；未命中任何客户端时集合原样写回。
    pub async fn del_inbound_client(
        &self,
        db: &DatabaseConnection,
        inbound_id: i64,
        identifier: &str,
    ) -> Result<SyncOutcome> {
        let txn = db.begin().await?;
        let inbound = Inbound::find_by_id(inbound_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::InboundNotFound(inbound_id))?;

        let mut settings = InboundSettings::decode(&inbound.settings)?;
        let mut removed: Option<ClientConfig> = None;
        settings.clients.retain(|existing| {
            if removed.is_none() {
                if let Ok(key) = client_key(inbound.protocol, existing) {
                    if key.value() == identifier {
                        removed = Some(existing.clone());
                        return false;
                    }
                }
            }
            true
        });

        if settings.clients.is_empty() {
            return Err(ServiceError::LastClient);
        }

        let mut model: inbound::ActiveModel = inbound.clone().into();
        model.settings = Set(settings.encode()?);
        model.updated_at = Set(Utc::now().naive_utc());
        model.update(&txn).await?;

        let Some(client) = removed else {
            txn.commit().await?;
            return Ok(SyncOutcome::Applied);
        };

        // 删行前先读台账状态：已耗尽的客户端早就不在引擎里了
        let mut still_live = false;
        if !client.email.is_empty() {
            if let Some(row) = ClientTraffic::find()
                .filter(client_traffic::Column::Email.eq(client.email.as_str()))
                .one(&txn)
                .await?
            {
                still_live = row.enable;
            }
            del_client_stat(&txn, &client.email).await?;
        }
        txn.commit().await?;

        debug!("入站 #{} 客户端 {} 已删除", inbound_id, identifier);
        if !client.email.is_empty() && client.enable && still_live {
            return Ok(self.sync.drop_user(&inbound.tag, &client.email).await);
        }
        Ok(SyncOutcome::Applied)
    }

    /// 清零某客户端的流量并重新启用
    pub async fn reset_client_traffic(
        &self,
        db: &DatabaseConnection,
        inbound_id: i64,
        email: &str,
    ) -> Result<SyncOutcome> {
        let txn = db.begin().await?;
        let row = ClientTraffic::find()
            .filter(client_traffic::Column::InboundId.eq(inbound_id))
            .filter(client_traffic::Column::Email.eq(email))
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::ClientNotFound(email.to_string()))?;
        let was_disabled = !row.enable;

        let mut stat: client_traffic::ActiveModel = row.into();
        stat.up = Set(0);
        stat.down = Set(0);
        stat.enable = Set(true);
        stat.updated_at = Set(Utc::now().naive_utc());
        stat.update(&txn).await?;

        let inbound = Inbound::find_by_id(inbound_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::InboundNotFound(inbound_id))?;
        txn.commit().await?;

        // 行曾被停用说明用户已从引擎摘除，客户端仍启用时补推回去
        let mut outcome = SyncOutcome::Applied;
        if was_disabled {
            let settings = InboundSettings::decode(&inbound.settings)?;
            if let Some(client) = settings.clients.iter().find(|c| c.email == email) {
                if client.enable {
                    let cipher = cipher_for(inbound.protocol, &settings);
                    outcome = self
                        .sync
                        .push_user(inbound.protocol, &inbound.tag, client, &cipher)
                        .await;
                }
            }
        }
        Ok(outcome)
    }

    /// 批量清零并重新启用台账行，`inbound_id` 为 None 时作用于全部入站
    pub async fn reset_all_client_traffics(
        &self,
        db: &DatabaseConnection,
        inbound_id: Option<i64>,
    ) -> Result<u64> {
        let mut update = ClientTraffic::update_many()
            .col_expr(client_traffic::Column::Up, Expr::value(0))
            .col_expr(client_traffic::Column::Down, Expr::value(0))
            .col_expr(client_traffic::Column::Enable, Expr::value(true))
            .col_expr(
                client_traffic::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            );
        if let Some(id) = inbound_id {
            update = update.filter(client_traffic::Column::InboundId.eq(id));
        }
        let res = update.exec(db).await?;
        info!("已清零 {} 条客户端流量", res.rows_affected);
        Ok(res.rows_affected)
    }

    /// 清零所有入站的上下行计数
    pub async fn reset_all_traffics(&self, db: &DatabaseConnection) -> Result<u64> {
        let res = Inbound::update_many()
            .col_expr(inbound::Column::Up, Expr::value(0))
            .col_expr(inbound::Column::Down, Expr::value(0))
            .col_expr(inbound::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    /// 清理已停用且不自动续期的客户端
    ///
    /// 客户端从设置里摘除、台账行删除；清空后的入站整体删除。
    /// `inbound_id` 为 None 时清扫所有入站。
    pub async fn del_depleted_clients(
        &self,
        db: &DatabaseConnection,
        inbound_id: Option<i64>,
    ) -> Result<SyncOutcome> {
        let txn = db.begin().await?;

        let mut filter = Condition::all()
            .add(client_traffic::Column::Enable.eq(false))
            .add(client_traffic::Column::Reset.eq(0));
        if let Some(id) = inbound_id {
            filter = filter.add(client_traffic::Column::InboundId.eq(id));
        }
        let depleted = ClientTraffic::find().filter(filter).all(&txn).await?;
        if depleted.is_empty() {
            txn.commit().await?;
            return Ok(SyncOutcome::Applied);
        }

        let mut by_inbound: HashMap<i64, HashSet<String>> = HashMap::new();
        for row in &depleted {
            by_inbound
                .entry(row.inbound_id)
                .or_default()
                .insert(row.email.clone());
        }

        let mut dropped_tags: Vec<String> = Vec::new();
        for (ib_id, emails) in &by_inbound {
            let Some(inbound) = Inbound::find_by_id(*ib_id).one(&txn).await? else {
                // 孤儿行，直接删
                ClientTraffic::delete_many()
                    .filter(client_traffic::Column::InboundId.eq(*ib_id))
                    .filter(client_traffic::Column::Email.is_in(emails.iter().cloned()))
                    .exec(&txn)
                    .await?;
                continue;
            };
            let mut settings = InboundSettings::decode(&inbound.settings)?;
            settings.clients.retain(|c| !emails.contains(&c.email));

            if settings.clients.is_empty() {
                if inbound.enable {
                    dropped_tags.push(inbound.tag.clone());
                }
                ClientTraffic::delete_many()
                    .filter(client_traffic::Column::InboundId.eq(*ib_id))
                    .exec(&txn)
                    .await?;
                Inbound::delete_by_id(*ib_id).exec(&txn).await?;
                info!("入站 #{} 所有客户端均已耗尽，整体删除", ib_id);
                continue;
            }

            let mut model: inbound::ActiveModel = inbound.into();
            model.settings = Set(settings.encode()?);
            model.updated_at = Set(Utc::now().naive_utc());
            model.update(&txn).await?;

            ClientTraffic::delete_many()
                .filter(client_traffic::Column::InboundId.eq(*ib_id))
                .filter(client_traffic::Column::Email.is_in(emails.iter().cloned()))
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;

        info!("已清理 {} 个耗尽客户端", depleted.len());
        let mut outcome = SyncOutcome::Applied;
        for tag in dropped_tags {
            outcome = outcome.merge(self.sync.drop_inbound(&tag).await);
        }
        Ok(outcome)
    }

    /// 按 id 查询单个入站
    pub async fn get_inbound(&self, db: &DatabaseConnection, id: i64) -> Result<inbound::Model> {
        Inbound::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::InboundNotFound(id))
    }

    /// 查询全部入站
    pub async fn get_all_inbounds(&self, db: &DatabaseConnection) -> Result<Vec<inbound::Model>> {
        Ok(Inbound::find().all(db).await?)
    }

    /// 按邮箱查询客户端台账
    pub async fn get_client_traffic_by_email(
        &self,
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<client_traffic::Model>> {
        Ok(ClientTraffic::find()
            .filter(client_traffic::Column::Email.eq(email))
            .one(db)
            .await?)
    }
}

/// 端口冲突检查，不分启用与否
async fn check_port_conflict(
    txn: &DatabaseTransaction,
    listen: &str,
    port: u16,
    ignore_id: Option<i64>,
) -> Result<()> {
    let mut cond = Condition::all().add(inbound::Column::Port.eq(port));
    if !is_any_listen(listen) {
        // 指定地址只与同地址或通配地址冲突
        cond = cond.add(
            Condition::any()
                .add(inbound::Column::Listen.eq(listen))
                .add(inbound::Column::Listen.is_in(ANY_LISTENS)),
        );
    }
    if let Some(id) = ignore_id {
        cond = cond.add(inbound::Column::Id.ne(id));
    }

    let count = Inbound::find().filter(cond).count(txn).await?;
    if count > 0 {
        return Err(ServiceError::PortConflict(port));
    }
    Ok(())
}

/// 汇总全库客户端邮箱（统一小写），解不开的设置跳过
async fn all_client_emails(txn: &DatabaseTransaction) -> Result<HashSet<String>> {
    let mut emails = HashSet::new();
    for row in Inbound::find().all(txn).await? {
        match InboundSettings::decode(&row.settings) {
            Ok(settings) => {
                for client in &settings.clients {
                    if !client.email.is_empty() {
                        emails.insert(client.email.to_lowercase());
                    }
                }
            }
            Err(e) => debug!("入站 #{} 设置无法解析，查重时跳过: {}", row.id, e),
        }
    }
    Ok(emails)
}

/// 新增邮箱查重：集合内部互斥，并与全库已有邮箱互斥
async fn ensure_unique_emails(txn: &DatabaseTransaction, clients: &[ClientConfig]) -> Result<()> {
    let existing = all_client_emails(txn).await?;
    let mut seen = HashSet::new();
    for client in clients {
        if client.email.is_empty() {
            continue;
        }
        let email = client.email.to_lowercase();
        if !seen.insert(email.clone()) || existing.contains(&email) {
            return Err(ServiceError::DuplicateEmail(client.email.clone()));
        }
    }
    Ok(())
}

/// 为有邮箱的客户端新建台账行
pub(crate) async fn add_client_stat(
    txn: &DatabaseTransaction,
    inbound_id: i64,
    client: &ClientConfig,
) -> Result<()> {
    let now = Utc::now().naive_utc();
    let stat = client_traffic::ActiveModel {
        id: NotSet,
        inbound_id: Set(inbound_id),
        email: Set(client.email.clone()),
        up: Set(0),
        down: Set(0),
        total: Set(client.total_gb),
        reset: Set(client.reset),
        expiry_time: Set(client.expiry_time),
        enable: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    stat.insert(txn).await?;
    Ok(())
}

/// 按旧邮箱改写台账行并重新启用，行不存在则不做任何事
async fn update_client_stat(
    txn: &DatabaseTransaction,
    email: &str,
    client: &ClientConfig,
) -> Result<()> {
    if let Some(row) = ClientTraffic::find()
        .filter(client_traffic::Column::Email.eq(email))
        .one(txn)
        .await?
    {
        let mut stat: client_traffic::ActiveModel = row.into();
        stat.email = Set(client.email.clone());
        stat.total = Set(client.total_gb);
        stat.reset = Set(client.reset);
        stat.expiry_time = Set(client.expiry_time);
        stat.enable = Set(true);
        stat.updated_at = Set(Utc::now().naive_utc());
        stat.update(txn).await?;
    }
    Ok(())
}

/// 按邮箱删除台账行
async fn del_client_stat(txn: &DatabaseTransaction, email: &str) -> Result<u64> {
    let res = ClientTraffic::delete_many()
        .filter(client_traffic::Column::Email.eq(email))
        .exec(txn)
        .await?;
    Ok(res.rows_affected)
}

/// 台账差量：整体更新时被移除的邮箱删行，新增的邮箱建行
async fn diff_client_stats(
    txn: &DatabaseTransaction,
    old: &inbound::Model,
    new: &inbound::Model,
) -> Result<()> {
    let old_settings = InboundSettings::decode(&old.settings)?;
    let new_settings = InboundSettings::decode(&new.settings)?;

    let old_emails: HashSet<&str> = old_settings
        .clients
        .iter()
        .map(|c| c.email.as_str())
        .filter(|e| !e.is_empty())
        .collect();
    let new_emails: HashSet<&str> = new_settings
        .clients
        .iter()
        .map(|c| c.email.as_str())
        .filter(|e| !e.is_empty())
        .collect();

    for client in &new_settings.clients {
        if !client.email.is_empty() && !old_emails.contains(client.email.as_str()) {
            add_client_stat(txn, old.id, client).await?;
        }
    }
    for email in old_emails {
        if !new_emails.contains(email) {
            del_client_stat(txn, email).await?;
        }
    }
    Ok(())
}
