//! User identity wire models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pharmadesk_core::{PermissionId, RoleId, UserId};

use crate::Permission;

/// An authenticated user account as reported by the API.
///
/// Replaced wholesale on login and profile refresh; the session store never
/// mutates individual fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<RoleId>,
    #[serde(default)]
    pub role_name: Option<String>,
    #[serde(default)]
    pub role_detail: Option<RoleDetail>,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    /// Flattened permission codes granted through the user's role. Absent
    /// for endpoints that return the slim user representation.
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// A role with its granted permissions, as managed on the roles screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleDetail {
    pub id: RoleId,
    pub name: String,
    pub permissions: Vec<PermissionId>,
    #[serde(default)]
    pub permissions_detail: Vec<PermissionDetail>,
    pub is_active: bool,
}

/// A single grantable permission, as managed on the permissions screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionDetail {
    pub id: PermissionId,
    pub name: String,
    pub codename: String,
    pub content_type: i64,
    pub content_type_label: String,
    pub content_type_model: String,
}
