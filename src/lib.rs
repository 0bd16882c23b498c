pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod pagination;
pub mod session;
pub mod types;

pub use api::{ApiClient, AuthApi};
pub use config::ClientConfig;
pub use error::ApiError;
pub use pagination::{PageQuery, PageUpdate, PaginationState};
pub use session::{Gate, SessionGuard, SessionStatus};

#[cfg(test)]
pub mod testing;
