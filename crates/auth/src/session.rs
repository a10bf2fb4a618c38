//! The session store: single source of truth for authentication state.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use crate::storage::{SessionSnapshot, SessionStorage};
use crate::{AuthTokens, InMemorySessionStorage, Permission, User};

/// Role name that bypasses all permission checks, compared
/// case-insensitively.
const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Default)]
struct Session {
    user: Option<User>,
    tokens: Option<AuthTokens>,
    authenticated: bool,
    permissions: HashSet<Permission>,
}

/// Holds the current user, token pair, and derived permission set, and
/// persists a snapshot across restarts.
///
/// Every mutation goes through one of the documented operations below; each
/// holds the write lock for the whole read-modify-write so concurrent
/// readers never observe a half-updated state. All operations are total:
/// persistence failures are logged and swallowed, never surfaced.
///
/// The authentication flag is derived state: it is true exactly when the
/// token pair is present, and is only ever written together with it.
pub struct SessionStore {
    state: RwLock<Session>,
    storage: Box<dyn SessionStorage>,
}

impl SessionStore {
    /// Create a store backed by `storage`, rehydrating the last persisted
    /// snapshot if one exists.
    pub fn new(storage: Box<dyn SessionStorage>) -> Self {
        let state = match storage.load() {
            Ok(Some(snapshot)) => Session {
                user: snapshot.user,
                tokens: snapshot.tokens,
                authenticated: snapshot.is_authenticated,
                permissions: snapshot.permissions.into_iter().collect(),
            },
            Ok(None) => Session::default(),
            Err(e) => {
                tracing::warn!("failed to rehydrate session, starting empty: {e}");
                Session::default()
            }
        };

        Self {
            state: RwLock::new(state),
            storage,
        }
    }

    /// Store with no durable backing; state dies with the process.
    pub fn in_memory() -> Self {
        Self::new(Box::new(InMemorySessionStorage::new()))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────

    /// Establish a session: sets the user and token pair and recomputes the
    /// permission set from the user record, all in one step.
    pub fn login(&self, user: User, tokens: AuthTokens) {
        let mut state = self.write();
        state.permissions = user.permissions.iter().cloned().collect();
        state.user = Some(user);
        state.tokens = Some(tokens);
        state.authenticated = true;
        self.persist(&state);
    }

    /// Clear the session entirely.
    pub fn logout(&self) {
        let mut state = self.write();
        *state = Session::default();
        self.persist(&state);
    }

    /// Replace the user record and recompute the permission set; the token
    /// pair is untouched. Used after a profile refresh.
    pub fn set_user(&self, user: User) {
        let mut state = self.write();
        state.permissions = user.permissions.iter().cloned().collect();
        state.user = Some(user);
        self.persist(&state);
    }

    /// Replace only the access token after a silent refresh, preserving the
    /// refresh token. A no-op when no token pair is held.
    pub fn update_access_token(&self, access: impl Into<String>) {
        let mut state = self.write();
        let Some(tokens) = state.tokens.as_mut() else {
            return;
        };
        tokens.access = access.into();
        self.persist(&state);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Read accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn tokens(&self) -> Option<AuthTokens> {
        self.read().tokens.clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.read().tokens.as_ref().map(|t| t.access.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read().tokens.as_ref().map(|t| t.refresh.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().authenticated
    }

    pub fn permissions(&self) -> HashSet<Permission> {
        self.read().permissions.clone()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Authorization predicates
    // ─────────────────────────────────────────────────────────────────────

    /// Whether the current user holds `code`.
    pub fn has_permission(&self, code: &str) -> bool {
        let state = self.read();
        Self::is_privileged(&state) || state.permissions.contains(code)
    }

    /// Whether the current user holds at least one of `codes`.
    pub fn has_any_permission(&self, codes: &[&str]) -> bool {
        let state = self.read();
        Self::is_privileged(&state) || codes.iter().any(|c| state.permissions.contains(*c))
    }

    /// Whether the current user holds every one of `codes`.
    pub fn has_all_permissions(&self, codes: &[&str]) -> bool {
        let state = self.read();
        Self::is_privileged(&state) || codes.iter().all(|c| state.permissions.contains(*c))
    }

    /// Admin/staff bypass. Checked before set membership so administrators
    /// pass even with an empty explicit permission set.
    fn is_privileged(state: &Session) -> bool {
        state.user.as_ref().is_some_and(|user| {
            user.is_staff
                || user
                    .role_name
                    .as_deref()
                    .is_some_and(|role| role.eq_ignore_ascii_case(ADMIN_ROLE))
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist a snapshot while still holding the write lock, so a
    /// concurrent mutation cannot interleave between state change and save.
    fn persist(&self, state: &Session) {
        let mut permissions: Vec<Permission> = state.permissions.iter().cloned().collect();
        permissions.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        let snapshot = SessionSnapshot {
            user: state.user.clone(),
            tokens: state.tokens.clone(),
            is_authenticated: state.authenticated,
            permissions,
        };

        if let Err(e) = self.storage.save(&snapshot) {
            tracing::warn!("failed to persist session snapshot: {e}");
        }
    }
}
