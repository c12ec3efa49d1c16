use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 为 client_traffic 表添加自动续期周期字段（天，0 表示关闭）
        manager
            .alter_table(
                Table::alter()
                    .table(ClientTraffic::Table)
                    .add_column(
                        ColumnDef::new(ClientTraffic::Reset)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(ClientTraffic::Table)
                    .drop_column(ClientTraffic::Reset)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ClientTraffic {
    Table,
    Reset,
}
