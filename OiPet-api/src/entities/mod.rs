// API-facing request and response shapes
pub mod common;

pub use common::{ApiResponse, DaysQuery, PaginatedResponse, PaginationParams};
