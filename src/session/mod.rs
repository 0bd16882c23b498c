//! Authenticated-user lifecycle: credential storage, session resolution,
//! and gating of protected views.

pub mod guard;
pub mod storage;
pub mod token;

pub use guard::{Gate, LoginRedirect, SessionGuard, SessionStatus};
pub use storage::{CredentialStore, FileStore, MemoryStore};
