use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ItemRequests::Table)
                    .if_not_exists()
                    .col(pk_uuid(ItemRequests::Id))
                    .col(string(ItemRequests::Description))
                    .col(uuid(ItemRequests::RequestorId))
                    .col(
                        timestamp_with_time_zone(ItemRequests::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_item_requests_requestor")
                            .from(ItemRequests::Table, ItemRequests::RequestorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_item_requests_requestor_id")
                    .table(ItemRequests::Table)
                    .col(ItemRequests::RequestorId)
                    .to_owned(),
            )
            .await?;

        // listAll sorts by creation time, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_item_requests_created_at")
                    .table(ItemRequests::Table)
                    .col(ItemRequests::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ItemRequests::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ItemRequests {
    Table,
    Id,
    Description,
    RequestorId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
