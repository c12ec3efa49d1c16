//! 服务层统一错误类型
//!
//! 校验类错误在任何持久化写入之前返回，调用方可按变体区分处理。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// 端口与已有入站冲突（含通配监听地址的情况）
    #[error("端口已被占用: {0}")]
    PortConflict(u16),

    /// 邮箱已被任意入站的客户端占用
    #[error("邮箱已存在: {0}")]
    DuplicateEmail(String),

    /// 协议标识字段（id / password / email）为空
    #[error("客户端标识不能为空")]
    EmptyIdentifier,

    /// 同一入站内出现重复的客户端标识
    #[error("客户端标识重复: {0}")]
    DuplicateClientId(String),

    /// 按标识未找到客户端
    #[error("客户端不存在: {0}")]
    ClientNotFound(String),

    /// 入站必须至少保留一个客户端
    #[error("入站至少需要保留一个客户端")]
    LastClient,

    #[error("入站不存在: #{0}")]
    InboundNotFound(i64),

    /// 设置字段不是合法的客户端集合 JSON
    #[error("入站设置解析失败: {0}")]
    Settings(String),

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
