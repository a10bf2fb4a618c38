//! User, role, and permission administration endpoints.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use pharmadesk_auth::{PermissionDetail, RoleDetail, User};
use pharmadesk_core::{
    ClientResult, ListEnvelope, PermissionId, Query, RoleId, UserId, endpoints,
};

use crate::HttpClient;

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct UserCreatePayload {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleId>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleId>,
}

#[derive(Debug, Clone, Default)]
pub struct UsersListParams {
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl UsersListParams {
    fn query(&self) -> Query {
        Query::new()
            .set("search", self.search.clone())
            .set("ordering", self.ordering.clone())
    }
}

pub struct UsersClient {
    http: Arc<HttpClient>,
}

impl UsersClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        params: &UsersListParams,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<User>> {
        let envelope: ListEnvelope<User> =
            self.http.get(endpoints::USERS, &params.query(), cancel).await?;
        Ok(envelope.into_vec())
    }

    pub async fn get(
        &self,
        id: UserId,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<User> {
        self.http
            .get(&endpoints::detail(endpoints::USERS, id), &Query::new(), cancel)
            .await
    }

    pub async fn create(&self, payload: &UserCreatePayload) -> ClientResult<User> {
        self.http.post(endpoints::USERS, Some(payload), None).await
    }

    pub async fn update(&self, id: UserId, payload: &UserUpdatePayload) -> ClientResult<User> {
        self.http
            .patch(&endpoints::detail(endpoints::USERS, id), Some(payload), None)
            .await
    }

    pub async fn delete(&self, id: UserId) -> ClientResult<()> {
        self.http
            .delete(&endpoints::detail(endpoints::USERS, id), None)
            .await
    }

    /// Authentication metadata for the current user. The payload shape is
    /// server-defined and surfaced untyped.
    pub async fn auth_info(&self, cancel: Option<&CancellationToken>) -> ClientResult<Value> {
        self.http
            .get(endpoints::USERS_AUTH_INFO, &Query::new(), cancel)
            .await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Roles
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RoleCreatePayload {
    pub name: String,
    pub permissions: Vec<PermissionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RoleUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<PermissionId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

pub struct RolesClient {
    http: Arc<HttpClient>,
}

impl RolesClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, cancel: Option<&CancellationToken>) -> ClientResult<Vec<RoleDetail>> {
        let envelope: ListEnvelope<RoleDetail> =
            self.http.get(endpoints::ROLES, &Query::new(), cancel).await?;
        Ok(envelope.into_vec())
    }

    pub async fn get(
        &self,
        id: RoleId,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<RoleDetail> {
        self.http
            .get(&endpoints::detail(endpoints::ROLES, id), &Query::new(), cancel)
            .await
    }

    pub async fn create(&self, payload: &RoleCreatePayload) -> ClientResult<RoleDetail> {
        self.http.post(endpoints::ROLES, Some(payload), None).await
    }

    pub async fn update(&self, id: RoleId, payload: &RoleUpdatePayload) -> ClientResult<RoleDetail> {
        self.http
            .patch(&endpoints::detail(endpoints::ROLES, id), Some(payload), None)
            .await
    }

    pub async fn delete(&self, id: RoleId) -> ClientResult<()> {
        self.http
            .delete(&endpoints::detail(endpoints::ROLES, id), None)
            .await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Permissions
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct PermissionCreatePayload {
    pub name: String,
    pub codename: String,
    pub content_type: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PermissionUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<i64>,
}

pub struct PermissionsClient {
    http: Arc<HttpClient>,
}

impl PermissionsClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<PermissionDetail>> {
        let envelope: ListEnvelope<PermissionDetail> = self
            .http
            .get(endpoints::PERMISSIONS, &Query::new(), cancel)
            .await?;
        Ok(envelope.into_vec())
    }

    pub async fn get(
        &self,
        id: PermissionId,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<PermissionDetail> {
        self.http
            .get(&endpoints::detail(endpoints::PERMISSIONS, id), &Query::new(), cancel)
            .await
    }

    pub async fn create(&self, payload: &PermissionCreatePayload) -> ClientResult<PermissionDetail> {
        self.http
            .post(endpoints::PERMISSIONS, Some(payload), None)
            .await
    }

    pub async fn update(
        &self,
        id: PermissionId,
        payload: &PermissionUpdatePayload,
    ) -> ClientResult<PermissionDetail> {
        self.http
            .patch(&endpoints::detail(endpoints::PERMISSIONS, id), Some(payload), None)
            .await
    }

    pub async fn delete(&self, id: PermissionId) -> ClientResult<()> {
        self.http
            .delete(&endpoints::detail(endpoints::PERMISSIONS, id), None)
            .await
    }
}
