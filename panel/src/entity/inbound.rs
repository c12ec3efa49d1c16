use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 入站协议，仅保留携带客户端列表的协议
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[sea_orm(string_value = "vmess")]
    Vmess,
    #[sea_orm(string_value = "vless")]
    Vless,
    #[sea_orm(string_value = "trojan")]
    Trojan,
    #[sea_orm(string_value = "shadowsocks")]
    Shadowsocks,
}

/// 协议的客户端标识类别
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyClass {
    Id,
    Password,
    Email,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Vmess => "vmess",
            Protocol::Vless => "vless",
            Protocol::Trojan => "trojan",
            Protocol::Shadowsocks => "shadowsocks",
        }
    }

    /// 客户端在该协议下以哪个字段作为标识
    pub fn key_class(&self) -> KeyClass {
        match self {
            Protocol::Vmess | Protocol::Vless => KeyClass::Id,
            Protocol::Trojan => KeyClass::Password,
            Protocol::Shadowsocks => KeyClass::Email,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inbound")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub up: i64,
    pub down: i64,
    pub total: i64,
    pub remark: String,
    pub enable: bool,
    #[serde(rename = "expiryTime")]
    pub expiry_time: i64,
    pub listen: String,
    pub port: u16,
    pub protocol: Protocol,
    pub settings: String,
    #[serde(rename = "streamSettings")]
    pub stream_settings: String,
    pub tag: String,
    pub sniffing: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::client_traffic::Entity")]
    ClientTraffic,
}

impl Related<super::client_traffic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClientTraffic.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
