//! `pharmadesk-auth` — session state and authorization policy.
//!
//! This crate owns the authenticated-identity state (user, token pair,
//! derived permission set), its durable snapshot, and the pure authorization
//! predicates and guards built on top of it. It is intentionally decoupled
//! from HTTP: the request pipeline reads and writes tokens through
//! [`SessionStore`]'s documented operations, and never the other way around.

pub mod guard;
pub mod permissions;
pub mod session;
pub mod storage;
pub mod tokens;
pub mod user;

pub use guard::{RouteDecision, RouteRule, ViewRule, require_authenticated};
pub use permissions::Permission;
pub use session::SessionStore;
pub use storage::{
    FileSessionStorage, InMemorySessionStorage, SessionSnapshot, SessionStorage, StorageError,
};
pub use tokens::AuthTokens;
pub use user::{PermissionDetail, RoleDetail, User};
