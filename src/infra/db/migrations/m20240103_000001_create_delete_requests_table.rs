//! Migration: Create delete_requests table.
//!
//! A partial unique index allows at most one pending request per client.
//! The table has no foreign key to clients: approving a request deletes
//! the client while the request row stays as the audit record.

use sea_orm_migration::prelude::*;

const PENDING_INDEX: &str = "idx_delete_requests_pending_client";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeleteRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeleteRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DeleteRequests::ClientId).uuid().not_null())
                    .col(ColumnDef::new(DeleteRequests::AccountantId).uuid().not_null())
                    .col(
                        ColumnDef::new(DeleteRequests::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(DeleteRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeleteRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_delete_requests_accountant_id")
                    .table(DeleteRequests::Table)
                    .col(DeleteRequests::AccountantId)
                    .to_owned(),
            )
            .await?;

        // Partial indexes are not expressible through the index builder;
        // this statement is valid on both PostgreSQL and SQLite.
        manager
            .get_connection()
            .execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {} ON delete_requests (client_id) \
                 WHERE status = 'pending'",
                PENDING_INDEX
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&format!("DROP INDEX IF EXISTS {}", PENDING_INDEX))
            .await?;

        manager
            .drop_table(Table::drop().table(DeleteRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DeleteRequests {
    Table,
    Id,
    ClientId,
    AccountantId,
    Status,
    CreatedAt,
    UpdatedAt,
}
