use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 客户端流量台账，每个有邮箱的客户端一行
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "client_traffic")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[serde(rename = "inboundId")]
    pub inbound_id: i64,
    pub email: String,
    pub up: i64,
    pub down: i64,
    pub total: i64,
    pub reset: i32,
    #[serde(rename = "expiryTime")]
    pub expiry_time: i64,
    pub enable: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inbound::Entity",
        from = "Column::InboundId",
        to = "super::inbound::Column::Id"
    )]
    Inbound,
}

impl Related<super::inbound::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inbound.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
