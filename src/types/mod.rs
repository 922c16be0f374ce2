//! Shared types for list and write endpoints.

mod pagination;
mod response;

pub use pagination::{
    ListQuery, Paginated, PaginatedAccountants, PaginatedClients, PaginatedDeleteRequests,
    PaginatedDocuments, PaginationMeta, PaginationParams,
};
pub use response::{Created, NoContent};
