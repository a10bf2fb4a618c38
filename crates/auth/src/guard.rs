//! Authorization gate: pure render/route decisions.
//!
//! Guards only consult the permission set already cached in the session
//! store; they never touch the network and never produce side effects. The
//! host shell owns what a denial actually does (hide an element, navigate to
//! the access-denied screen).

use std::borrow::Cow;

use crate::{Permission, SessionStore};

/// Outcome of a route check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    /// Not authenticated at all; the host should send the user to login.
    RedirectToLogin,
    /// Authenticated but not authorized for this route.
    AccessDenied,
}

/// Authentication-only guard for protected areas.
///
/// Runs before any role/permission criteria are considered; an anonymous
/// visitor is redirected to login, never to access-denied.
pub fn require_authenticated(session: &SessionStore) -> RouteDecision {
    if session.is_authenticated() {
        RouteDecision::Allow
    } else {
        RouteDecision::RedirectToLogin
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conditional rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Visibility rule for a UI region.
///
/// At most one criterion is evaluated per decision, in priority order:
/// the single permission, then the any-of list, then the all-of list. With
/// no criteria configured the region is visible.
#[derive(Debug, Clone, Default)]
pub struct ViewRule {
    permission: Option<Permission>,
    any_of: Vec<Permission>,
    all_of: Vec<Permission>,
}

impl ViewRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn permission(mut self, code: impl Into<Cow<'static, str>>) -> Self {
        self.permission = Some(Permission::new(code));
        self
    }

    pub fn any_of<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        self.any_of = codes.into_iter().map(Permission::new).collect();
        self
    }

    pub fn all_of<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        self.all_of = codes.into_iter().map(Permission::new).collect();
        self
    }

    /// Whether the region should render for the current session.
    pub fn allows(&self, session: &SessionStore) -> bool {
        if let Some(permission) = &self.permission {
            return session.has_permission(permission.as_str());
        }

        if !self.any_of.is_empty() {
            let codes: Vec<&str> = self.any_of.iter().map(Permission::as_str).collect();
            return session.has_any_permission(&codes);
        }

        if !self.all_of.is_empty() {
            let codes: Vec<&str> = self.all_of.iter().map(Permission::as_str).collect();
            return session.has_all_permissions(&codes);
        }

        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Route guarding
// ─────────────────────────────────────────────────────────────────────────────

/// Entry rule for a route.
///
/// Unlike [`ViewRule`], every configured criterion is enforced (logical
/// AND); unconfigured criteria are skipped. Role names are matched exactly,
/// with no administrative bypass: an allowed-role list means that list.
#[derive(Debug, Clone)]
pub struct RouteRule {
    allowed_roles: Vec<String>,
    permission: Option<Permission>,
    permissions: Vec<Permission>,
    require_all: bool,
}

impl Default for RouteRule {
    fn default() -> Self {
        Self {
            allowed_roles: Vec::new(),
            permission: None,
            permissions: Vec::new(),
            require_all: true,
        }
    }
}

impl RouteRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allowed_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn permission(mut self, code: impl Into<Cow<'static, str>>) -> Self {
        self.permission = Some(Permission::new(code));
        self
    }

    /// Require the listed permissions; `require_all` picks between all-of
    /// and any-of semantics.
    pub fn permissions<I, S>(mut self, codes: I, require_all: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        self.permissions = codes.into_iter().map(Permission::new).collect();
        self.require_all = require_all;
        self
    }

    /// Decide entry for the current session.
    pub fn check(&self, session: &SessionStore) -> RouteDecision {
        if !session.is_authenticated() {
            return RouteDecision::RedirectToLogin;
        }

        if !self.allowed_roles.is_empty() {
            let role = session.user().and_then(|u| u.role_name);
            let allowed = role
                .map(|r| self.allowed_roles.iter().any(|a| a == &r))
                .unwrap_or(false);
            if !allowed {
                return RouteDecision::AccessDenied;
            }
        }

        if let Some(permission) = &self.permission {
            if !session.has_permission(permission.as_str()) {
                return RouteDecision::AccessDenied;
            }
        }

        if !self.permissions.is_empty() {
            let codes: Vec<&str> = self.permissions.iter().map(Permission::as_str).collect();
            let held = if self.require_all {
                session.has_all_permissions(&codes)
            } else {
                session.has_any_permission(&codes)
            };
            if !held {
                return RouteDecision::AccessDenied;
            }
        }

        RouteDecision::Allow
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pharmadesk_core::UserId;

    use super::*;
    use crate::{AuthTokens, User};

    fn session_with(role_name: Option<&str>, permissions: &[&str]) -> SessionStore {
        let store = SessionStore::in_memory();
        store.login(
            User {
                id: UserId::new(),
                username: "tester".to_string(),
                email: "tester@example.com".to_string(),
                role: None,
                role_name: role_name.map(str::to_string),
                role_detail: None,
                is_active: true,
                is_staff: false,
                created_at: Utc::now(),
                permissions: permissions
                    .iter()
                    .map(|p| Permission::new(p.to_string()))
                    .collect(),
            },
            AuthTokens::new("a", "r"),
        );
        store
    }

    #[test]
    fn view_rule_defaults_to_visible() {
        let session = session_with(None, &[]);
        assert!(ViewRule::new().allows(&session));
    }

    #[test]
    fn view_rule_single_permission_takes_precedence() {
        let session = session_with(None, &["manage_users"]);

        // Single permission held, any-of list not held: visible, because
        // only the highest-priority criterion is evaluated.
        let rule = ViewRule::new()
            .permission("manage_users")
            .any_of(["view_sales", "manage_sales"]);
        assert!(rule.allows(&session));

        // And the converse: single permission missing hides the region even
        // though the any-of list would pass.
        let rule = ViewRule::new()
            .permission("manage_sales")
            .any_of(["manage_users"]);
        assert!(!rule.allows(&session));
    }

    #[test]
    fn view_rule_any_of_beats_all_of() {
        let session = session_with(None, &["view_reports"]);

        let rule = ViewRule::new()
            .any_of(["view_reports"])
            .all_of(["view_reports", "export_data"]);
        assert!(rule.allows(&session));
    }

    #[test]
    fn view_rule_all_of_requires_every_code() {
        let session = session_with(None, &["view_reports"]);

        assert!(!ViewRule::new().all_of(["view_reports", "export_data"]).allows(&session));

        let session = session_with(None, &["view_reports", "export_data"]);
        assert!(ViewRule::new().all_of(["view_reports", "export_data"]).allows(&session));
    }

    #[test]
    fn route_rule_redirects_anonymous_to_login() {
        let session = SessionStore::in_memory();
        let rule = RouteRule::new().permission("view_user");
        assert_eq!(rule.check(&session), RouteDecision::RedirectToLogin);
        assert_eq!(require_authenticated(&session), RouteDecision::RedirectToLogin);
    }

    #[test]
    fn route_rule_denies_role_outside_allowed_list() {
        let session = session_with(Some("Cashier"), &[]);
        let rule = RouteRule::new().allowed_roles(["Manager", "Pharmacist"]);
        assert_eq!(rule.check(&session), RouteDecision::AccessDenied);

        let session = session_with(Some("Manager"), &[]);
        assert_eq!(rule.check(&session), RouteDecision::Allow);
    }

    #[test]
    fn route_rule_denies_missing_role_name() {
        let session = session_with(None, &[]);
        let rule = RouteRule::new().allowed_roles(["Manager"]);
        assert_eq!(rule.check(&session), RouteDecision::AccessDenied);
    }

    #[test]
    fn route_rule_ands_configured_criteria() {
        let session = session_with(Some("Manager"), &["view_user"]);

        // Role passes, single permission fails.
        let rule = RouteRule::new()
            .allowed_roles(["Manager"])
            .permission("delete_user");
        assert_eq!(rule.check(&session), RouteDecision::AccessDenied);

        // Both pass.
        let rule = RouteRule::new()
            .allowed_roles(["Manager"])
            .permission("view_user");
        assert_eq!(rule.check(&session), RouteDecision::Allow);
    }

    #[test]
    fn route_rule_any_vs_all_flag() {
        let session = session_with(None, &["view_user"]);

        let any = RouteRule::new().permissions(["view_user", "delete_user"], false);
        assert_eq!(any.check(&session), RouteDecision::Allow);

        let all = RouteRule::new().permissions(["view_user", "delete_user"], true);
        assert_eq!(all.check(&session), RouteDecision::AccessDenied);
    }

    #[test]
    fn route_rule_unconfigured_criteria_are_skipped() {
        let session = session_with(None, &[]);
        assert_eq!(RouteRule::new().check(&session), RouteDecision::Allow);
    }
}
