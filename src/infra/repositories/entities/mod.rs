//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Status, category and file-type columns are stored as their canonical
//! strings and parsed back on load; a value that no longer parses is
//! reported as an internal error.

pub mod accountant;
pub mod admin;
pub mod client;
pub mod delete_request;
pub mod document;
pub mod justification_document;

use std::str::FromStr;

use crate::errors::AppError;

/// Parse a stored enum column, reporting corrupt rows as internal errors.
pub(crate) fn parse_column<T>(table: &str, column: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
{
    raw.parse().map_err(|_| {
        AppError::internal(format!(
            "Stored value '{}' in {}.{} is not recognised",
            raw, table, column
        ))
    })
}
