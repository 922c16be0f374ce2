//! Migration: Create documents and justification_documents tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Documents::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Documents::Title).string().not_null())
                    .col(ColumnDef::new(Documents::FileUrl).text().not_null())
                    .col(ColumnDef::new(Documents::FileType).string_len(8).not_null())
                    .col(ColumnDef::new(Documents::Category).string_len(32).not_null())
                    .col(ColumnDef::new(Documents::MetaDate).date().not_null())
                    .col(ColumnDef::new(Documents::Amount).decimal_len(14, 2).null())
                    .col(ColumnDef::new(Documents::Currency).string_len(8).null())
                    .col(ColumnDef::new(Documents::PartyName).string().null())
                    .col(ColumnDef::new(Documents::PartyType).string_len(16).null())
                    .col(ColumnDef::new(Documents::Reference).string().null())
                    .col(ColumnDef::new(Documents::Notes).text().null())
                    .col(ColumnDef::new(Documents::ClientId).uuid().not_null())
                    .col(
                        ColumnDef::new(Documents::Status)
                            .string_len(16)
                            .not_null()
                            .default("new"),
                    )
                    .col(ColumnDef::new(Documents::AssignedAccountantId).uuid().not_null())
                    .col(
                        ColumnDef::new(Documents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Documents::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_documents_client_id")
                            .from(Documents::Table, Documents::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_documents_client_id")
                    .table(Documents::Table)
                    .col(Documents::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JustificationDocuments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JustificationDocuments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(JustificationDocuments::DocumentId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(JustificationDocuments::Title).string().not_null())
                    .col(ColumnDef::new(JustificationDocuments::FileUrl).text().not_null())
                    .col(
                        ColumnDef::new(JustificationDocuments::FileType)
                            .string_len(8)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JustificationDocuments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_justification_documents_document_id")
                            .from(JustificationDocuments::Table, JustificationDocuments::DocumentId)
                            .to(Documents::Table, Documents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JustificationDocuments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Clients {
    Table,
    Id,
}

#[derive(Iden)]
enum Documents {
    Table,
    Id,
    Title,
    FileUrl,
    FileType,
    Category,
    MetaDate,
    Amount,
    Currency,
    PartyName,
    PartyType,
    Reference,
    Notes,
    ClientId,
    Status,
    AssignedAccountantId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum JustificationDocuments {
    Table,
    Id,
    DocumentId,
    Title,
    FileUrl,
    FileType,
    CreatedAt,
}
