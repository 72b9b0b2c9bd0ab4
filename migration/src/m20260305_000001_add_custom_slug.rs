use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Affiliates {
    Table,
    CustomSlug,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Affiliates::Table)
                    .add_column(ColumnDef::new(Affiliates::CustomSlug).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_affiliates_custom_slug")
                    .table(Affiliates::Table)
                    .col(Affiliates::CustomSlug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uq_affiliates_custom_slug")
                    .table(Affiliates::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Affiliates::Table)
                    .drop_column(Affiliates::CustomSlug)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
