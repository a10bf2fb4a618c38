//! `pharmadesk-client` — the request pipeline and account/directory clients.
//!
//! [`HttpClient`] is the single entry point for network I/O: it attaches
//! bearer credentials from the session store, performs at-most-one token
//! refresh on an authorization failure, and surfaces everything else to the
//! caller unchanged. Resource clients in this and the domain crates are thin
//! typed wrappers over it.

pub mod account;
pub mod directory;
pub mod http;

pub use account::{
    AuthClient, ChangePasswordPayload, LoginPayload, RegisterPayload, TokenRefresh,
    UpdateProfilePayload,
};
pub use directory::{
    PermissionCreatePayload, PermissionUpdatePayload, PermissionsClient, RoleCreatePayload,
    RoleUpdatePayload, RolesClient, UserCreatePayload, UserUpdatePayload, UsersClient,
    UsersListParams,
};
pub use http::HttpClient;
