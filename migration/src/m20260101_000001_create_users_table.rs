use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Users::PublicId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Users::UserName).string().not_null())
                    .col(ColumnDef::new(Users::NormalizedUserName).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::NormalizedEmail).string().not_null())
                    .col(ColumnDef::new(Users::EmailConfirmed).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::PhoneNumber).string().null())
                    .col(ColumnDef::new(Users::StreetAddress).string().null())
                    .col(ColumnDef::new(Users::City).string().null())
                    .col(ColumnDef::new(Users::State).string().null())
                    .col(ColumnDef::new(Users::PostalCode).string().null())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        // Lookups by identity always go through the normalized columns
        manager
            .create_index(
                Index::create()
                    .name("idx_users_normalized_email")
                    .table(Users::Table)
                    .col(Users::NormalizedEmail)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_normalized_user_name")
                    .table(Users::Table)
                    .col(Users::NormalizedUserName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum Users {
    Table,
    Id,
    PublicId,
    UserName,
    NormalizedUserName,
    Email,
    NormalizedEmail,
    EmailConfirmed,
    PasswordHash,
    Name,
    PhoneNumber,
    StreetAddress,
    City,
    State,
    PostalCode,
    CreatedAt,
    UpdatedAt,
}
