use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 inbound 表
        manager
            .create_table(
                Table::create()
                    .table(Inbound::Table)
                    .if_not_exists()
                    .col(big_integer(Inbound::Id).auto_increment().primary_key())
                    .col(big_integer(Inbound::Up).default(0))
                    .col(big_integer(Inbound::Down).default(0))
                    .col(big_integer(Inbound::Total).default(0))
                    .col(string(Inbound::Remark).default(""))
                    .col(boolean(Inbound::Enable).default(true))
                    .col(big_integer(Inbound::ExpiryTime).default(0))
                    .col(string(Inbound::Listen).default(""))
                    .col(integer(Inbound::Port))
                    .col(string(Inbound::Protocol))
                    .col(text(Inbound::Settings))
                    .col(text(Inbound::StreamSettings))
                    .col(string(Inbound::Tag))
                    .col(text(Inbound::Sniffing))
                    .col(timestamp(Inbound::CreatedAt))
                    .col(timestamp(Inbound::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // tag 由 listen+port 推导，必须唯一
        manager
            .create_index(
                Index::create()
                    .name("idx_inbound_tag")
                    .table(Inbound::Table)
                    .col(Inbound::Tag)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 端口冲突检查按 port 查询
        manager
            .create_index(
                Index::create()
                    .name("idx_inbound_port")
                    .table(Inbound::Table)
                    .col(Inbound::Port)
                    .to_owned(),
            )
            .await?;

        // 创建 client_traffic 表
        manager
            .create_table(
                Table::create()
                    .table(ClientTraffic::Table)
                    .if_not_exists()
                    .col(big_integer(ClientTraffic::Id).auto_increment().primary_key())
                    .col(big_integer(ClientTraffic::InboundId))
                    .col(string(ClientTraffic::Email))
                    .col(big_integer(ClientTraffic::Up).default(0))
                    .col(big_integer(ClientTraffic::Down).default(0))
                    .col(big_integer(ClientTraffic::Total).default(0))
                    .col(big_integer(ClientTraffic::ExpiryTime).default(0))
                    .col(boolean(ClientTraffic::Enable).default(true))
                    .col(timestamp(ClientTraffic::CreatedAt))
                    .col(timestamp(ClientTraffic::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // 邮箱全局唯一
        manager
            .create_index(
                Index::create()
                    .name("idx_client_traffic_email")
                    .table(ClientTraffic::Table)
                    .col(ClientTraffic::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_client_traffic_inbound_id")
                    .table(ClientTraffic::Table)
                    .col(ClientTraffic::InboundId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClientTraffic::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Inbound::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Inbound {
    Table,
    Id,
    Up,
    Down,
    Total,
    Remark,
    Enable,
    ExpiryTime,
    Listen,
    Port,
    Protocol,
    Settings,
    StreamSettings,
    Tag,
    Sniffing,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClientTraffic {
    Table,
    Id,
    InboundId,
    Email,
    Up,
    Down,
    Total,
    ExpiryTime,
    Enable,
    CreatedAt,
    UpdatedAt,
}
