//! Bearer token pair.

use serde::{Deserialize, Serialize};

/// Access/refresh token pair issued at login.
///
/// Both are opaque bearer strings; the client never decodes them. The
/// access token is short-lived and is the only field that changes after
/// issuance (replaced in place by a silent refresh); the refresh token is
/// immutable for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access: String,
    pub refresh: String,
}

impl AuthTokens {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}
