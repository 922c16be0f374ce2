//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_principal_tables;
mod m20240102_000001_create_document_tables;
mod m20240103_000001_create_delete_requests_table;

/// Tables owned by the migrations, children before parents.
pub const MANAGED_TABLES: [&str; 6] = [
    "delete_requests",
    "justification_documents",
    "documents",
    "clients",
    "accountants",
    "admins",
];

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_principal_tables::Migration),
            Box::new(m20240102_000001_create_document_tables::Migration),
            Box::new(m20240103_000001_create_delete_requests_table::Migration),
        ]
    }
}
