use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Append-only; the auto-increment id is the write order
        manager
            .create_table(
                Table::create()
                    .table(UserActivityLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserActivityLog::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserActivityLog::UserId).big_integer().null())
                    .col(ColumnDef::new(UserActivityLog::Username).string().not_null())
                    .col(ColumnDef::new(UserActivityLog::ActivityType).string().not_null())
                    .col(ColumnDef::new(UserActivityLog::Description).string().not_null())
                    .col(ColumnDef::new(UserActivityLog::IpAddress).string().null())
                    .col(ColumnDef::new(UserActivityLog::UserAgent).string().null())
                    .col(ColumnDef::new(UserActivityLog::Success).boolean().not_null())
                    .col(ColumnDef::new(UserActivityLog::ErrorMessage).string().null())
                    .col(ColumnDef::new(UserActivityLog::RequestId).string().null())
                    .col(ColumnDef::new(UserActivityLog::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_activity_log_user_id")
                    .table(UserActivityLog::Table)
                    .col(UserActivityLog::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_activity_log_created_at")
                    .table(UserActivityLog::Table)
                    .col(UserActivityLog::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserActivityLog::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserActivityLog {
    Table,
    Id,
    UserId,
    Username,
    ActivityType,
    Description,
    IpAddress,
    UserAgent,
    Success,
    ErrorMessage,
    RequestId,
    CreatedAt,
}
