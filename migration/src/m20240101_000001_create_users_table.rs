use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Users::Table)
                .if_not_exists()
                .col(ColumnDef::new(Users::TelegramId).big_integer().not_null().primary_key())
                .col(ColumnDef::new(Users::FirstName).string().null())
                .col(ColumnDef::new(Users::LastName).string().null())
                .col(ColumnDef::new(Users::Username).string().null())
                .col(ColumnDef::new(Users::WalletAddress).string().null())
                .col(
                    ColumnDef::new(Users::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .col(
                    ColumnDef::new(Users::UpdatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .to_owned()
        ).await?;

        // Lookups by linked wallet
        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_users_wallet_address")
                .table(Users::Table)
                .col(Users::WalletAddress)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    TelegramId,
    FirstName,
    LastName,
    Username,
    WalletAddress,
    CreatedAt,
    UpdatedAt,
}
