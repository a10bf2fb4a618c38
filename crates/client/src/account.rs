//! Account and authentication endpoints.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use pharmadesk_auth::{AuthTokens, User};
use pharmadesk_core::{ClientResult, Query, endpoints};

use crate::HttpClient;

#[derive(Debug, Clone, Serialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterPayload {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProfilePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordPayload {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
struct VerifyTokenPayload<'a> {
    token: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshTokenPayload<'a> {
    refresh: &'a str,
}

/// Response of an explicit token refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefresh {
    pub access: String,
}

/// Client for the auth endpoints, plus the composed session flows.
///
/// The raw endpoint methods do not touch the session store; `sign_in`,
/// `sign_out`, and `refresh_profile` are the write-through flows a host
/// normally uses.
pub struct AuthClient {
    http: Arc<HttpClient>,
}

impl AuthClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Raw endpoints
    // ─────────────────────────────────────────────────────────────────────

    pub async fn login(&self, payload: &LoginPayload) -> ClientResult<AuthTokens> {
        self.http.post(endpoints::AUTH_LOGIN, Some(payload), None).await
    }

    pub async fn register(&self, payload: &RegisterPayload) -> ClientResult<User> {
        self.http.post(endpoints::AUTH_REGISTER, Some(payload), None).await
    }

    /// Explicitly mint a new access token. The pipeline performs this
    /// silently on 401; this method exists for hosts that refresh eagerly.
    pub async fn refresh_token(&self, refresh: &str) -> ClientResult<TokenRefresh> {
        self.http
            .post(endpoints::AUTH_REFRESH, Some(&RefreshTokenPayload { refresh }), None)
            .await
    }

    pub async fn verify_token(&self, token: &str) -> ClientResult<()> {
        self.http
            .post(endpoints::AUTH_VERIFY, Some(&VerifyTokenPayload { token }), None)
            .await
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.http.post::<(), ()>(endpoints::AUTH_LOGOUT, None, None).await
    }

    pub async fn current_user(&self, cancel: Option<&CancellationToken>) -> ClientResult<User> {
        self.http.get(endpoints::AUTH_ME, &Query::new(), cancel).await
    }

    pub async fn update_profile(&self, payload: &UpdateProfilePayload) -> ClientResult<User> {
        self.http.patch(endpoints::AUTH_ME, Some(payload), None).await
    }

    pub async fn change_password(&self, payload: &ChangePasswordPayload) -> ClientResult<()> {
        self.http
            .post(endpoints::AUTH_SET_PASSWORD, Some(payload), None)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Composed session flows
    // ─────────────────────────────────────────────────────────────────────

    /// Full sign-in: exchange credentials for tokens, fetch the profile with
    /// the fresh access token, then establish the session in one atomic
    /// store operation.
    pub async fn sign_in(&self, payload: &LoginPayload) -> ClientResult<User> {
        let tokens = self.login(payload).await?;
        let user: User = self
            .http
            .get_with_token(endpoints::AUTH_ME, &tokens.access)
            .await?;
        self.http.session().login(user.clone(), tokens);
        Ok(user)
    }

    /// Sign out: best-effort server-side logout, then clear the session
    /// unconditionally. A failed server call never leaves the local session
    /// behind.
    pub async fn sign_out(&self) {
        if let Err(e) = self.logout().await {
            tracing::warn!("server logout failed, clearing local session anyway: {e}");
        }
        self.http.session().logout();
    }

    /// Re-fetch the profile and replace the stored user, preserving tokens.
    pub async fn refresh_profile(&self, cancel: Option<&CancellationToken>) -> ClientResult<User> {
        let user = self.current_user(cancel).await?;
        self.http.session().set_user(user.clone());
        Ok(user)
    }
}
